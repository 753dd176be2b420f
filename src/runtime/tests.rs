use std::path::Path;
use std::sync::Arc;

use tempfile::tempdir;

use crate::host::InMemoryHost;
use crate::store::ModeStore;
use crate::toolbox::{ToolboxConfig, ToolboxError, ToolboxSettings};

use super::AppContext;
use super::documents::is_yaml;
use super::{read_document, write_document};

#[test]
fn context_rejects_invalid_settings() {
    let host = InMemoryHost::shared();
    let settings = ToolboxSettings {
        safe_tool: "  ".to_string(),
        ..ToolboxSettings::default()
    };
    let result = AppContext::new(ModeStore::shared(), host.services(), settings);
    assert!(matches!(result, Err(ToolboxError::InvalidSettings(_))));
}

#[test]
fn reactions_are_installed_once_per_context() {
    let host = InMemoryHost::shared();
    let context = AppContext::with_defaults(host.services());
    let baseline = context.store().subscriber_count();
    let _toolboxes = (0..3)
        .map(|_| context.mount_toolbox(ToolboxConfig::new("aiToolBox", "AI Tools")))
        .collect::<Vec<_>>();
    assert_eq!(context.store().subscriber_count(), baseline + 3);

    context.store().set_refine_new(true);
    context.store().set_locked(true);
    assert_eq!(host.dispatched_named("resetNninter").len(), 1);
    assert_eq!(host.dispatched_named("setToolActive").len(), 1);
}

#[test]
fn contexts_can_share_a_store() {
    let host = InMemoryHost::shared();
    let store = ModeStore::shared();
    let first = AppContext::new(Arc::clone(&store), host.services(), ToolboxSettings::default())
        .expect("context");
    let second = AppContext::new(Arc::clone(&store), host.services(), ToolboxSettings::default())
        .expect("context");
    first.store().set_pos_neg(true);
    assert!(second.store().pos_neg());
}

#[test]
fn dropping_the_context_releases_its_reactions() {
    let host = InMemoryHost::shared();
    let store = ModeStore::shared();
    let context = AppContext::new(Arc::clone(&store), host.services(), ToolboxSettings::default())
        .expect("context");
    let installed = store.subscriber_count();
    drop(context);
    assert_eq!(store.subscriber_count(), 0);
    assert!(installed > 0);
}

#[test]
fn document_format_follows_the_extension() {
    assert!(is_yaml(Path::new("session.yaml")));
    assert!(is_yaml(Path::new("session.YML")));
    assert!(!is_yaml(Path::new("session.json")));
    assert!(!is_yaml(Path::new("session")));
}

#[test]
fn settings_documents_round_trip_in_both_formats() {
    let dir = tempdir().expect("tempdir");
    let mut settings = ToolboxSettings::default();
    settings.safe_tool = "Zoom".to_string();

    for name in ["settings.yml", "settings.json"] {
        let path = dir.path().join(name);
        write_document::<_, ToolboxError>(&path, &settings).expect("write");
        let loaded: ToolboxSettings = read_document::<_, ToolboxError>(&path).expect("read");
        assert_eq!(loaded, settings);
        assert_eq!(ToolboxSettings::load(&path).expect("load").safe_tool, "Zoom");
    }

    let broken = dir.path().join("broken.yaml");
    std::fs::write(&broken, "hotkeys: [").expect("write");
    assert!(matches!(
        ToolboxSettings::load(&broken),
        Err(ToolboxError::SerdeYaml(_))
    ));
}
