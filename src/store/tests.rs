use std::sync::{Arc, Mutex};

use crate::model::{LockState, SelectedModel};

use super::{ModeChange, ModeStore, QueryField};

fn recording_store() -> (Arc<ModeStore>, Arc<Mutex<Vec<ModeChange>>>, super::Subscription) {
    let store = ModeStore::shared();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |change, _| {
        sink.lock().expect("sink").push(*change);
    });
    (store, seen, subscription)
}

#[test]
fn refine_clears_pos_neg_for_every_prior_value() {
    for prior in [false, true] {
        let store = ModeStore::new();
        store.set_pos_neg(prior);
        store.set_refine_new(true);
        assert!(store.refine_new());
        assert!(!store.pos_neg());
    }
}

#[test]
fn disabling_refine_leaves_pos_neg_alone() {
    let store = ModeStore::new();
    store.set_refine_new(true);
    store.set_pos_neg(true);
    store.set_refine_new(false);
    assert!(store.pos_neg());
}

#[test]
fn refine_reports_both_changes_in_order() {
    let (store, seen, _subscription) = recording_store();
    store.set_pos_neg(true);
    store.set_refine_new(true);
    assert_eq!(
        *seen.lock().expect("seen"),
        vec![
            ModeChange::PosNeg(true),
            ModeChange::RefineNew(true),
            ModeChange::PosNeg(false),
        ]
    );
}

#[test]
fn unchanged_values_do_not_notify() {
    let (store, seen, _subscription) = recording_store();
    assert!(!store.set_live_mode(true));
    assert!(!store.set_pos_neg(false));
    assert!(!store.set_query_result(None));
    assert!(seen.lock().expect("seen").is_empty());
}

#[test]
fn cycling_four_times_returns_to_start() {
    let store = ModeStore::new();
    store.set_selected_model(SelectedModel::MedSam2);
    let visited = (0..4).map(|_| store.cycle_model()).collect::<Vec<_>>();
    assert_eq!(
        visited,
        vec![
            SelectedModel::Sam3,
            SelectedModel::NnInteractive,
            SelectedModel::Sam2,
            SelectedModel::MedSam2,
        ]
    );
}

#[test]
fn concurrent_cycles_never_lose_a_step() {
    let (store, seen, _subscription) = recording_store();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..25 {
                    store.cycle_model();
                }
            });
        }
    });
    assert_eq!(store.selected_model(), SelectedModel::NnInteractive);
    assert_eq!(seen.lock().expect("seen").len(), 100);
}

#[test]
fn locking_forces_live_off_and_records_prior_modes() {
    let (store, seen, _subscription) = recording_store();
    store.set_pos_neg(true);
    assert!(store.set_locked(true));
    assert!(!store.live_mode());

    let lock = store.lock_state();
    let before = lock.before().expect("locked");
    assert!(before.live_mode);
    assert!(before.pos_neg);
    assert_eq!(
        *seen.lock().expect("seen"),
        vec![
            ModeChange::PosNeg(true),
            ModeChange::LiveMode(false),
            ModeChange::Locked(true),
        ]
    );
}

#[test]
fn live_mode_cannot_be_enabled_while_locked() {
    let store = ModeStore::new();
    store.set_locked(true);
    assert!(!store.set_live_mode(true));
    assert!(!store.live_mode());
}

#[test]
fn unlocking_restores_nothing() {
    let store = ModeStore::new();
    store.set_locked(true);
    assert!(store.set_locked(false));
    assert_eq!(store.lock_state(), LockState::Unlocked);
    assert!(!store.live_mode());
    assert!(store.set_live_mode(true));
}

#[test]
fn repeated_lock_is_a_no_op() {
    let store = ModeStore::new();
    assert!(store.set_locked(true));
    assert!(!store.set_locked(true));
}

#[test]
fn query_fields_notify_by_field() {
    let (store, seen, _subscription) = recording_store();
    store.set_query_text("where is the lesion?");
    store.set_query_start_slice(Some(3));
    store.set_query_result(Some("none".to_string()));
    assert_eq!(
        *seen.lock().expect("seen"),
        vec![
            ModeChange::Query(QueryField::Query),
            ModeChange::Query(QueryField::StartSlice),
            ModeChange::Query(QueryField::Result),
        ]
    );
    assert_eq!(store.snapshot().query.start_slice, Some(3));
}

#[test]
fn dropping_subscription_unsubscribes() {
    let (store, seen, subscription) = recording_store();
    assert_eq!(store.subscriber_count(), 1);
    drop(subscription);
    assert_eq!(store.subscriber_count(), 0);
    store.set_pos_neg(true);
    assert!(seen.lock().expect("seen").is_empty());
}

#[test]
fn listeners_may_write_back_to_the_store() {
    let store = ModeStore::shared();
    let writer = Arc::clone(&store);
    let _subscription = store.subscribe(move |change, _| {
        if *change == ModeChange::PromptReplaceNew(true) {
            writer.set_active_segment_index(7);
        }
    });
    store.set_prompt_replace_new(true);
    assert_eq!(store.active_segment_index(), 7);
}
