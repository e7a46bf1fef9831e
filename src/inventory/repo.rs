//! Inventory mutation rules: quantity accounting and image lifecycle
//!
//! Every mutation is an independent read-modify-write against the remote
//! store with no locking, so two concurrent mutations of the same item are
//! last-write-wins (a second browser tab can clobber a quantity update).
//! Accepted limitation of the design; fixing it would need a transactional
//! store contract.
//!
//! Item names are taken verbatim as record keys, the empty string included.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::store::{JsonMap, RemoteStore, StoreError};

/// Document collection holding the inventory
const COLLECTION: &str = "inventory";

/// A tracked pantry item. `quantity` is at least 1: a record whose quantity
/// would reach 0 is deleted instead of stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u32,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

/// Inventory operation errors
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Inventory repository: add/remove/list over an injected remote store
#[derive(Clone)]
pub struct InventoryRepo {
    store: Arc<dyn RemoteStore>,
}

impl InventoryRepo {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self { store }
    }

    /// Full inventory in store order; callers re-sort and filter
    pub async fn list(&self) -> Result<Vec<Item>, InventoryError> {
        let records = self.store.list_records(COLLECTION).await?;
        Ok(records
            .iter()
            .map(|(name, fields)| item_from_fields(name, fields))
            .collect())
    }

    /// Add one unit of `name`, then return the re-fetched inventory.
    ///
    /// A first add creates the record with quantity 1 and uploads `image`
    /// (when supplied) under the item's deterministic blob key. Adds to an
    /// existing item bump the quantity and keep the stored `imageURL`; a
    /// newly supplied payload is ignored in that case, matching the
    /// original behavior of the app.
    pub async fn add(&self, name: &str, image: Option<Bytes>) -> Result<Vec<Item>, InventoryError> {
        match self.store.get_record(COLLECTION, name).await? {
            Some(fields) => {
                let item = item_from_fields(name, &fields);
                debug!(item = name, quantity = item.quantity + 1, "incrementing item");
                self.store
                    .put_record(
                        COLLECTION,
                        name,
                        record_fields(item.quantity + 1, &item.image_url),
                    )
                    .await?;
            }
            None => {
                let image_url = match image {
                    Some(bytes) => {
                        let handle = self.store.upload_blob(&blob_key(name), bytes).await?;
                        self.store.blob_url(&handle).await?
                    }
                    None => String::new(),
                };
                info!(item = name, has_image = !image_url.is_empty(), "creating item");
                self.store
                    .put_record(COLLECTION, name, record_fields(1, &image_url))
                    .await?;
            }
        }
        self.list().await
    }

    /// Remove one unit of `name`, then return the re-fetched inventory.
    ///
    /// No-op when the item is absent. The last unit deletes the record, and
    /// its image blob first: blob deletion is best effort and never blocks
    /// the record delete.
    pub async fn remove(&self, name: &str) -> Result<Vec<Item>, InventoryError> {
        if let Some(fields) = self.store.get_record(COLLECTION, name).await? {
            let item = item_from_fields(name, &fields);
            if item.quantity <= 1 {
                if !item.image_url.is_empty() {
                    match self.store.delete_blob(&item.image_url).await {
                        Ok(()) => info!(item = name, "deleted item image"),
                        Err(err) => error!(item = name, %err, "failed to delete item image"),
                    }
                }
                info!(item = name, "deleting item");
                self.store.delete_record(COLLECTION, name).await?;
            } else {
                debug!(item = name, quantity = item.quantity - 1, "decrementing item");
                self.store
                    .put_record(
                        COLLECTION,
                        name,
                        record_fields(item.quantity - 1, &item.image_url),
                    )
                    .await?;
            }
        }
        self.list().await
    }
}

/// Storage object key for an item's image (one blob per item name,
/// overwritten on re-upload)
pub(crate) fn blob_key(name: &str) -> String {
    format!("images/{}.png", name)
}

fn record_fields(quantity: u32, image_url: &str) -> JsonMap {
    let mut fields = JsonMap::new();
    fields.insert("quantity".into(), json!(quantity));
    fields.insert("imageURL".into(), json!(image_url));
    fields
}

fn item_from_fields(name: &str, fields: &JsonMap) -> Item {
    Item {
        name: name.to_string(),
        quantity: fields
            .get("quantity")
            .and_then(Value::as_u64)
            .unwrap_or(0) as u32,
        image_url: fields
            .get("imageURL")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_fields_round_trip() {
        let fields = record_fields(4, "memory://images/pear.png");
        let item = item_from_fields("pear", &fields);
        assert_eq!(
            item,
            Item {
                name: "pear".to_string(),
                quantity: 4,
                image_url: "memory://images/pear.png".to_string(),
            }
        );
    }

    #[test]
    fn missing_fields_default_sanely() {
        let item = item_from_fields("mystery", &JsonMap::new());
        assert_eq!(item.quantity, 0);
        assert!(item.image_url.is_empty());
    }

    #[test]
    fn blob_key_is_deterministic_per_name() {
        assert_eq!(blob_key("apple"), "images/apple.png");
        assert_eq!(blob_key("apple"), blob_key("apple"));
    }
}
