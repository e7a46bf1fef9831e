//! Application state shared with the view layer

use std::sync::Arc;

use bytes::Bytes;

use crate::capture::CaptureSession;
use crate::config::Config;
use crate::inventory::{InventoryError, InventoryRepo, Item};
use crate::store::{FirebaseClient, RemoteStore};

/// Shared application state embedded by the view layer
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub inventory: InventoryRepo,
    pub capture: Arc<CaptureSession>,
}

impl AppState {
    /// Wire up the production Firebase-backed state
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let store: Arc<dyn RemoteStore> = Arc::new(FirebaseClient::new(&config));
        Self::with_store(config, store)
    }

    /// Wire up against any store implementation (tests inject a `MemoryStore`)
    pub fn with_store(config: Arc<Config>, store: Arc<dyn RemoteStore>) -> Self {
        Self {
            config,
            inventory: InventoryRepo::new(store),
            capture: Arc::new(CaptureSession::new()),
        }
    }

    /// Stage a captured or picked image for the next added item
    pub fn stage_image(&self, image: Bytes) {
        self.capture.stage(image);
    }

    /// Add one unit of `name`, consuming the staged image on success.
    /// A failed add keeps the staged image so the user can retry.
    pub async fn add_item(&self, name: &str) -> Result<Vec<Item>, InventoryError> {
        let image = self.capture.peek();
        let items = self.inventory.add(name, image).await?;
        self.capture.clear();
        Ok(items)
    }

    /// Remove one unit of `name`
    pub async fn remove_item(&self, name: &str) -> Result<Vec<Item>, InventoryError> {
        self.inventory.remove(name).await
    }

    /// Current inventory as stored
    pub async fn list_items(&self) -> Result<Vec<Item>, InventoryError> {
        self.inventory.list().await
    }
}
