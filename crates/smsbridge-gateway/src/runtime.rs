//! BridgeRuntime - lifecycle owner for the bridge
//!
//! Created once per process. The consumer-hosting surface calls
//! `on_surface_attached` when it becomes active and `on_surface_detached`
//! when it goes away; the transport calls into `receiver()`.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use smsbridge_core::{
    branding, consumer_channel, BridgeConfig, ConsumerReceiver, MessageStore, SharedConsumer,
};
use smsbridge_storage::{Database, SqliteInboxStore};
use tracing::info;
use uuid::Uuid;

use crate::gateway::{AttachmentState, BridgeGateway};
use crate::query::QueryBridge;
use crate::receiver::SmsReceiver;
use crate::relay::Relay;

pub struct BridgeRuntime {
    config: BridgeConfig,
    gateway: Arc<BridgeGateway>,
    receiver: Arc<SmsReceiver>,
}

impl BridgeRuntime {
    pub fn new(config: BridgeConfig, store: Arc<dyn MessageStore>) -> Self {
        let query = Arc::new(QueryBridge::new(store));
        let gateway = Arc::new(BridgeGateway::new(&config, query));
        let receiver = Arc::new(SmsReceiver::new(Relay::new(gateway.clone())));

        info!(
            product = branding::DISPLAY_NAME,
            app_id = %config.app_id,
            channel = %config.channel,
            "[Runtime] Bridge initialized"
        );

        Self {
            config,
            gateway,
            receiver,
        }
    }

    /// Build a runtime over the SQLite inbox at the configured path.
    pub fn open_sqlite(config: BridgeConfig) -> Result<Self> {
        let path = config.resolved_database_path();
        info!("[Runtime] Opening inbox database at {:?}", path);
        let db = Database::open(&path)?;
        let store = Arc::new(SqliteInboxStore::new(Arc::new(Mutex::new(db))));
        Ok(Self::new(config, store))
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn gateway(&self) -> &Arc<BridgeGateway> {
        &self.gateway
    }

    pub fn receiver(&self) -> &Arc<SmsReceiver> {
        &self.receiver
    }

    pub fn state(&self) -> AttachmentState {
        self.gateway.state()
    }

    /// The consumer surface became active.
    pub fn on_surface_attached(&self, consumer: SharedConsumer) -> Uuid {
        self.gateway.attach(consumer, self.config.receiver_export)
    }

    /// Attach a fresh in-process channel and hand back its receiving half.
    pub fn attach_channel(&self) -> ConsumerReceiver {
        let (sender, receiver) = consumer_channel();
        self.on_surface_attached(Arc::new(sender));
        receiver
    }

    /// The consumer surface went away. Never fails, even if already detached.
    pub fn on_surface_detached(&self) {
        self.gateway.detach();
    }
}

impl Drop for BridgeRuntime {
    fn drop(&mut self) {
        self.gateway.detach();
    }
}
