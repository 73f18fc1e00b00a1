//! Runtime construction and teardown

use std::sync::Arc;

use pretty_assertions::assert_eq;
use smsbridge_core::{BridgeConfig, BridgeRequest, NormalizedRecord, ReceiverExport};
use smsbridge_gateway::{AttachmentState, BridgeRuntime};
use smsbridge_storage::{Database, SqliteInboxStore};
use tests::{MockMessageStore, RecordingConsumer};

#[tokio::test]
async fn test_open_sqlite_from_config() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("inbox.db");
    {
        let db = Database::open(&db_path).expect("Failed to open database");
        let store = SqliteInboxStore::new(Arc::new(parking_lot::Mutex::new(db)));
        store
            .insert(&NormalizedRecord::new("A", "stored", 7))
            .expect("insert failed");
    }

    let config = BridgeConfig::from_lookup(|key| match key {
        "SMSBRIDGE_DATABASE" => Some(db_path.to_string_lossy().into_owned()),
        _ => None,
    })
    .expect("config");
    let runtime = BridgeRuntime::open_sqlite(config).expect("Failed to open runtime");

    let response = runtime.gateway().handle(BridgeRequest::scan_all()).await;
    assert_eq!(
        response.records(),
        Some(&[NormalizedRecord::new("A", "stored", 7)][..])
    );
}

#[test]
fn test_exported_receiver_from_config() {
    let config = BridgeConfig::from_lookup(|key| match key {
        "SMSBRIDGE_RECEIVER_EXPORTED" => Some("true".to_string()),
        _ => None,
    })
    .expect("config");
    assert_eq!(config.receiver_export, ReceiverExport::Exported);

    let runtime = BridgeRuntime::new(config, Arc::new(MockMessageStore::new()));
    let consumer = Arc::new(RecordingConsumer::new());
    runtime.on_surface_attached(consumer.clone());

    let outcome = runtime.gateway().deliver_from(
        "com.example.partner",
        smsbridge_core::RelayEvent::received(NormalizedRecord::new("A", "b", 1)),
    );
    assert_eq!(outcome, smsbridge_gateway::PushOutcome::Delivered);
}

#[test]
fn test_drop_detaches() {
    let runtime = BridgeRuntime::new(BridgeConfig::default(), Arc::new(MockMessageStore::new()));
    let gateway = runtime.gateway().clone();
    runtime.on_surface_attached(Arc::new(RecordingConsumer::new()));
    assert_eq!(gateway.state(), AttachmentState::Attached);

    drop(runtime);
    assert_eq!(gateway.state(), AttachmentState::Detached);
}

#[test]
fn test_detach_twice_never_fails() {
    let runtime = BridgeRuntime::new(BridgeConfig::default(), Arc::new(MockMessageStore::new()));
    runtime.on_surface_detached();
    runtime.on_surface_attached(Arc::new(RecordingConsumer::new()));
    runtime.on_surface_detached();
    runtime.on_surface_detached();
    assert_eq!(runtime.state(), AttachmentState::Detached);
}
