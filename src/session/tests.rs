use serde_json::json;
use tempfile::tempdir;

use crate::host::Command;
use crate::model::{SectionId, SelectedModel};
use crate::toolbox::{FocusTarget, ToolboxConfig};

use super::{
    SessionError, SessionSpec, SessionStep, load_session, render_section, run_session,
    save_report,
};

const LOCK_REVIEW: &str = include_str!("../../demos/lock_review.yaml");

fn lock_review() -> SessionSpec {
    serde_yaml::from_str(LOCK_REVIEW).expect("session")
}

#[test]
fn lock_review_session_replays_end_to_end() {
    let report = run_session(&lock_review()).expect("replay");

    assert_eq!(report.session_name.as_deref(), Some("lock-review"));
    assert_eq!(report.failed_steps().count(), 0);
    let names = report
        .dispatched
        .iter()
        .map(Command::name)
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "resetNninter",
            "setToolActive",
            "setToolActive",
            "runSegmentBidirectional",
            "jumpToMeasurement",
            "testMedgemma",
        ]
    );
    assert_eq!(report.active_tool.as_deref(), Some("Pan"));
    assert!(report.interactions.is_empty());

    let modes = &report.final_modes;
    assert!(modes.is_locked());
    assert!(!modes.live_mode);
    assert!(!modes.pos_neg);
    assert!(modes.refine_new);
    assert_eq!(modes.query.result.as_deref(), Some("No acute findings."));

    assert_eq!(
        report.steps[0].outcome,
        json!([
            {"section": "aiToolBox", "outcome": "applied", "action": "togglePosNeg", "changed": true},
            {"section": "testMedgemmaToolbox", "outcome": "alreadyHandled"},
        ])
    );
    let measurement = &report.steps[6].outcome;
    assert_eq!(measurement["state"], "ready");
    assert_eq!(measurement["length"], "30.1 mm");
    assert_eq!(measurement["width"], "12.3 mm");
    assert_eq!(measurement["visible"], false);
    assert_eq!(report.steps[7].outcome, json!({"visible": true}));

    let frame = &report.steps[10].outcome;
    assert_eq!(frame["open"], false);
    assert!(frame["body"].is_null());
}

#[test]
fn failing_steps_are_reported_and_replay_continues() {
    let mut spec = lock_review();
    spec.steps = vec![
        SessionStep::ToggleLock {
            section: "testMedgemmaToolbox".into(),
        },
        SessionStep::RunQuery {
            section: "testMedgemmaToolbox".into(),
        },
        SessionStep::SelectModel {
            section: "aiToolBox".into(),
            model: SelectedModel::Sam3,
        },
    ];
    let report = run_session(&spec).expect("replay");

    let errors = report
        .steps
        .iter()
        .map(|step| step.error.is_some())
        .collect::<Vec<_>>();
    assert_eq!(errors, vec![true, true, false]);
    assert_eq!(
        report.steps[1].error.as_deref(),
        Some("toolbox step failed: query must not be empty")
    );
    assert_eq!(report.final_modes.selected_model, SelectedModel::Sam3);
}

#[test]
fn steps_must_target_mounted_toolboxes() {
    let mut spec = lock_review();
    spec.steps.push(SessionStep::Render {
        section: "textPromptSegmentationToolbox".into(),
    });
    let error = run_session(&spec).expect_err("unmounted");
    assert!(matches!(error, SessionError::Parse(ref message) if message.contains("unmounted")));
}

#[test]
fn sessions_need_unique_toolboxes() {
    let mut spec = lock_review();
    spec.toolboxes
        .push(ToolboxConfig::new("aiToolBox", "Duplicate"));
    assert!(matches!(spec.validate(), Err(SessionError::Parse(_))));

    spec.toolboxes.clear();
    assert!(matches!(spec.validate(), Err(SessionError::Parse(_))));
}

#[test]
fn key_steps_default_to_unfocused() {
    let step: SessionStep = serde_json::from_value(json!({"step": "key", "key": "q"})).expect("step");
    assert_eq!(
        step,
        SessionStep::Key {
            key: "q".to_string(),
            focus: FocusTarget::None,
        }
    );
}

#[test]
fn render_section_uses_the_fixture_without_replaying() {
    let frame = render_section(&lock_review(), &SectionId::new("aiToolBox"))
        .expect("render")
        .expect("frame");
    assert!(frame.open);
    assert_eq!(frame.header.title, "AI Tools");
    let body = frame.body.expect("body");
    assert_eq!(
        body.active_options.map(|options| options.0),
        Some(json!([{"id": "clickMode", "value": "point"}]))
    );

    assert!(
        render_section(&lock_review(), &SectionId::new("unknown"))
            .expect("render")
            .is_none()
    );
}

#[test]
fn sessions_and_reports_round_trip_through_files() {
    let dir = tempdir().expect("tempdir");
    let session_path = dir.path().join("session.yaml");
    std::fs::write(&session_path, LOCK_REVIEW).expect("write session");

    let spec = load_session(&session_path).expect("load");
    assert_eq!(spec, lock_review());

    let report = run_session(&spec).expect("replay");
    let report_path = dir.path().join("report.json");
    save_report(&report_path, &report).expect("save");
    let raw = std::fs::read_to_string(&report_path).expect("read report");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert_eq!(parsed["sessionName"], "lock-review");
    assert_eq!(parsed["steps"].as_array().map(Vec::len), Some(11));

    let yaml_path = dir.path().join("report.yml");
    save_report(&yaml_path, &report).expect("save yaml");
    assert!(
        std::fs::read_to_string(&yaml_path)
            .expect("read yaml")
            .contains("sessionName: lock-review")
    );
}
