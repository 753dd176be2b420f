use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{LockState, ModeSnapshot, PreLockModes, SelectedModel};

use super::subscription::{Listener, ListenerRegistry};
use super::{ModeChange, QueryField, Subscription};

/// Shared toolbox mode state with push notification.
///
/// Setters return whether the stored value changed; listeners only hear about
/// effective changes, in the order they were applied.
#[derive(Default)]
pub struct ModeStore {
    state: Mutex<ModeSnapshot>,
    listeners: Arc<ListenerRegistry>,
}

impl fmt::Debug for ModeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeStore")
            .field("state", &*self.state())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ModeSnapshot) -> Self {
        Self {
            state: Mutex::new(state),
            listeners: Arc::default(),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ModeChange, &ModeSnapshot) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        self.listeners.add(listener)
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn snapshot(&self) -> ModeSnapshot {
        self.state().clone()
    }

    pub fn live_mode(&self) -> bool {
        self.state().live_mode
    }

    pub fn pos_neg(&self) -> bool {
        self.state().pos_neg
    }

    pub fn refine_new(&self) -> bool {
        self.state().refine_new
    }

    pub fn prompt_replace_new(&self) -> bool {
        self.state().prompt_replace_new
    }

    pub fn selected_model(&self) -> SelectedModel {
        self.state().selected_model
    }

    pub fn is_locked(&self) -> bool {
        self.state().lock.is_locked()
    }

    pub fn lock_state(&self) -> LockState {
        self.state().lock
    }

    pub fn active_segment_index(&self) -> u32 {
        self.state().active_segment_index
    }

    /// Live inference cannot be switched on while locked.
    pub fn set_live_mode(&self, enabled: bool) -> bool {
        self.update(|state| {
            if enabled && state.lock.is_locked() {
                tracing::debug!("live mode stays off while the toolbox is locked");
                return Vec::new();
            }
            replace(&mut state.live_mode, enabled, ModeChange::LiveMode)
        })
    }

    pub fn set_pos_neg(&self, enabled: bool) -> bool {
        self.update(|state| replace(&mut state.pos_neg, enabled, ModeChange::PosNeg))
    }

    /// Enabling refine clears pos/neg; the two are never both on.
    pub fn set_refine_new(&self, enabled: bool) -> bool {
        self.update(|state| {
            let mut changes = replace(&mut state.refine_new, enabled, ModeChange::RefineNew);
            if enabled {
                changes.extend(replace(&mut state.pos_neg, false, ModeChange::PosNeg));
            }
            changes
        })
    }

    pub fn set_prompt_replace_new(&self, enabled: bool) -> bool {
        self.update(|state| {
            replace(
                &mut state.prompt_replace_new,
                enabled,
                ModeChange::PromptReplaceNew,
            )
        })
    }

    pub fn set_selected_model(&self, model: SelectedModel) -> bool {
        self.update(|state| replace(&mut state.selected_model, model, ModeChange::SelectedModel))
    }

    /// Advances to the next model in declaration order and returns it.
    pub fn cycle_model(&self) -> SelectedModel {
        let mut next = SelectedModel::default();
        self.update(|state| {
            next = state.selected_model.next();
            replace(&mut state.selected_model, next, ModeChange::SelectedModel)
        });
        next
    }

    /// Locking records the current modes and forces live inference off in the
    /// same mutation. Unlocking leaves every mode as it is.
    pub fn set_locked(&self, locked: bool) -> bool {
        self.update(|state| {
            if locked == state.lock.is_locked() {
                return Vec::new();
            }
            if !locked {
                state.lock = LockState::Unlocked;
                return vec![ModeChange::Locked(false)];
            }
            let before = PreLockModes {
                live_mode: state.live_mode,
                pos_neg: state.pos_neg,
                refine_new: state.refine_new,
                prompt_replace_new: state.prompt_replace_new,
                selected_model: state.selected_model,
            };
            let mut changes = replace(&mut state.live_mode, false, ModeChange::LiveMode);
            state.lock = LockState::Locked { before };
            changes.push(ModeChange::Locked(true));
            changes
        })
    }

    pub fn set_active_segment_index(&self, index: u32) -> bool {
        self.update(|state| {
            replace(
                &mut state.active_segment_index,
                index,
                ModeChange::ActiveSegment,
            )
        })
    }

    pub fn set_query_instruction(&self, instruction: impl Into<String>) -> bool {
        let instruction = instruction.into();
        self.update(|state| {
            replace(&mut state.query.instruction, instruction, |_| {
                ModeChange::Query(QueryField::Instruction)
            })
        })
    }

    pub fn set_query_text(&self, query: impl Into<String>) -> bool {
        let query = query.into();
        self.update(|state| {
            replace(&mut state.query.query, query, |_| {
                ModeChange::Query(QueryField::Query)
            })
        })
    }

    pub fn set_query_start_slice(&self, slice: Option<i64>) -> bool {
        self.update(|state| {
            replace(&mut state.query.start_slice, slice, |_| {
                ModeChange::Query(QueryField::StartSlice)
            })
        })
    }

    pub fn set_query_end_slice(&self, slice: Option<i64>) -> bool {
        self.update(|state| {
            replace(&mut state.query.end_slice, slice, |_| {
                ModeChange::Query(QueryField::EndSlice)
            })
        })
    }

    pub fn set_query_result(&self, result: Option<String>) -> bool {
        self.update(|state| {
            replace(&mut state.query.result, result, |_| {
                ModeChange::Query(QueryField::Result)
            })
        })
    }

    fn state(&self) -> MutexGuard<'_, ModeSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, apply: impl FnOnce(&mut ModeSnapshot) -> Vec<ModeChange>) -> bool {
        let (changes, snapshot) = {
            let mut state = self.state();
            let changes = apply(&mut state);
            if changes.is_empty() {
                return false;
            }
            (changes, state.clone())
        };
        for change in &changes {
            self.listeners.notify(change, &snapshot);
        }
        true
    }
}

fn replace<T, F>(slot: &mut T, value: T, change: F) -> Vec<ModeChange>
where
    T: PartialEq + Clone,
    F: FnOnce(T) -> ModeChange,
{
    if *slot == value {
        return Vec::new();
    }
    *slot = value.clone();
    vec![change(value)]
}
