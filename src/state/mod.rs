pub mod hub;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    config::AppConfig,
    dao::{
        content_store::{ContentStore, MemoryContentStore},
        storage::StorageResult,
    },
    dto::ws::{DisplayMessage, Snapshot},
};

pub use self::hub::{AttachError, ConnectionId, DisplayHub, FrameSender};

pub type SharedState = Arc<AppState>;

/// Central application state: the content store and the display broadcast hub.
pub struct AppState {
    store: Arc<dyn ContentStore>,
    hub: DisplayHub,
    writes: Mutex<()>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(store: Arc<dyn ContentStore>) -> SharedState {
        Arc::new(Self {
            store,
            hub: DisplayHub::new(),
            writes: Mutex::new(()),
        })
    }

    /// State backed by an in-memory store seeded from `config`.
    pub fn from_config(config: &AppConfig) -> SharedState {
        Self::new(Arc::new(MemoryContentStore::seeded(config.seed())))
    }

    /// Source of truth for venue content.
    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    /// Broadcast hub fanning out content changes to displays.
    pub fn hub(&self) -> &DisplayHub {
        &self.hub
    }

    /// Serialize gateway mutations. Hold the guard across the store write and
    /// its [`publish`](Self::publish) so events leave in commit order.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    /// Assemble a full snapshot from the content store.
    pub async fn snapshot(&self) -> StorageResult<Snapshot> {
        crate::dao::content_store::load_snapshot(self.store()).await
    }

    /// Hand a change notification to the hub.
    pub async fn publish(&self, message: DisplayMessage) {
        self.hub.publish(&message).await;
    }
}
