//! Request handling: scanAll, unknown methods, raw JSON

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use smsbridge_core::{
    BridgeConfig, BridgeRequest, BridgeResponse, InboxQuery, MessageStore, NormalizedRecord,
    RowStream, SortOrder, StoreError, INVALID_REQUEST, SCAN_ERROR,
};
use smsbridge_gateway::{BridgeGateway, QueryBridge};
use tests::MockMessageStore;

fn gateway_over(store: Arc<dyn MessageStore>, config: &BridgeConfig) -> BridgeGateway {
    BridgeGateway::new(config, Arc::new(QueryBridge::new(store)))
}

fn gateway(store: MockMessageStore) -> BridgeGateway {
    gateway_over(Arc::new(store), &BridgeConfig::default())
}

/// Blocks for longer than any test timeout
struct SlowStore(Duration);

impl MessageStore for SlowStore {
    fn query_inbox(&self, _query: &InboxQuery) -> Result<RowStream, StoreError> {
        std::thread::sleep(self.0);
        Ok(Box::new(std::iter::empty()))
    }
}

/// Records how many scans run at once
#[derive(Default)]
struct CountingStore {
    delay_ms: AtomicU64,
    running: AtomicUsize,
    max_running: AtomicUsize,
    started: AtomicUsize,
}

impl CountingStore {
    fn with_delay(ms: u64) -> Self {
        let store = Self::default();
        store.delay_ms.store(ms, Ordering::SeqCst);
        store
    }
}

impl MessageStore for CountingStore {
    fn query_inbox(&self, _query: &InboxQuery) -> Result<RowStream, StoreError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(self.delay_ms.load(Ordering::SeqCst)));
        self.running.fetch_sub(1, Ordering::SeqCst);
        Ok(Box::new(std::iter::empty()))
    }
}

struct PanickingStore;

impl MessageStore for PanickingStore {
    fn query_inbox(&self, _query: &InboxQuery) -> Result<RowStream, StoreError> {
        panic!("content provider died");
    }
}

#[tokio::test]
async fn test_scan_all_returns_store_rows() {
    let store = Arc::new(
        MockMessageStore::new()
            .with_record("A", "hi", 300)
            .with_record("B", "yo", 200),
    );
    let gateway = gateway_over(store.clone(), &BridgeConfig::default());

    let response = gateway.handle(BridgeRequest::scan_all()).await;
    assert_eq!(
        response.records(),
        Some(
            &[
                NormalizedRecord::new("A", "hi", 300),
                NormalizedRecord::new("B", "yo", 200),
            ][..]
        )
    );

    let queries = store.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].order, SortOrder::DateDescending);
}

#[tokio::test]
async fn test_scan_all_denied_is_empty_success() {
    let response = gateway(MockMessageStore::denied())
        .handle(BridgeRequest::scan_all())
        .await;
    assert_eq!(response, BridgeResponse::success(Vec::new()));
}

#[tokio::test]
async fn test_scan_all_keeps_rows_before_cursor_error() {
    let store = MockMessageStore::new()
        .with_record("A", "hi", 300)
        .with_cursor_error("database disk image is malformed")
        .with_record("B", "yo", 200);

    let response = gateway(store).handle(BridgeRequest::scan_all()).await;
    assert_eq!(response.records().map(<[_]>::len), Some(1));
}

#[tokio::test]
async fn test_unknown_method() {
    let response = gateway(MockMessageStore::new())
        .handle(BridgeRequest::new("unknownThing"))
        .await;
    assert!(response.is_not_implemented());
}

#[tokio::test]
async fn test_scan_crash_is_scan_error() {
    let gateway = gateway_over(Arc::new(PanickingStore), &BridgeConfig::default());
    match gateway.handle(BridgeRequest::scan_all()).await {
        BridgeResponse::Error(err) => assert_eq!(err.code, SCAN_ERROR),
        other => panic!("expected SCAN_ERROR, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_scan_timeout_returns_empty() {
    let config = BridgeConfig {
        scan_timeout_ms: 50,
        ..BridgeConfig::default()
    };
    let gateway = gateway_over(Arc::new(SlowStore(Duration::from_millis(500))), &config);

    let response = gateway.handle(BridgeRequest::scan_all()).await;
    assert_eq!(response, BridgeResponse::success(Vec::new()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_timed_out_scan_still_holds_scan_slot() {
    let config = BridgeConfig {
        scan_timeout_ms: 50,
        ..BridgeConfig::default()
    };
    let store = Arc::new(CountingStore::with_delay(300));
    let gateway = gateway_over(store.clone(), &config);

    let first = gateway.handle(BridgeRequest::scan_all()).await;
    let second = gateway.handle(BridgeRequest::scan_all()).await;
    assert_eq!(first, BridgeResponse::success(Vec::new()));
    assert_eq!(second, BridgeResponse::success(Vec::new()));

    // Let the abandoned scan finish, then the slot is free again
    store.delay_ms.store(0, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(400)).await;
    gateway.handle(BridgeRequest::scan_all()).await;

    assert_eq!(store.max_running.load(Ordering::SeqCst), 1);
    assert_eq!(store.started.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_scans_both_answered() {
    let gateway = Arc::new(gateway(MockMessageStore::new().with_record("A", "hi", 1)));

    let (a, b) = tokio::join!(
        gateway.handle(BridgeRequest::scan_all()),
        gateway.handle(BridgeRequest::scan_all())
    );
    assert_eq!(a, b);
    assert_eq!(a.records().map(<[_]>::len), Some(1));
}

#[tokio::test]
async fn test_handle_json_shapes() {
    let gateway = gateway(MockMessageStore::new().with_record("BANK", "Paid 10", 42));

    let raw = gateway.handle_json(r#"{"method":"scanAll"}"#).await;
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        json!({
            "status": "success",
            "result": [{"sender": "BANK", "body": "Paid 10", "timestamp": 42}]
        })
    );

    let raw = gateway.handle_json(r#"{"method":"deleteAll"}"#).await;
    assert_eq!(raw, r#"{"status":"notImplemented"}"#);
}

#[tokio::test]
async fn test_handle_json_malformed() {
    let gateway = gateway(MockMessageStore::new());
    let raw = gateway.handle_json(r#"{"verb":"scanAll"}"#).await;
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], INVALID_REQUEST);
}
