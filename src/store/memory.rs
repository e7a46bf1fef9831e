//! In-process store implementing the remote contract
//!
//! Backs the test suite and local development; no network, no persistence.
//! Listing order is the key order of the underlying map, which is as
//! arbitrary as the hosted store's order from the caller's point of view.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use super::remote::{JsonMap, RemoteStore, StoreError};

const URL_SCHEME: &str = "memory://";

/// In-memory document collections and blob storage
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, BTreeMap<String, JsonMap>>>,
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs (test support)
    pub fn blob_count(&self) -> usize {
        self.blobs.lock().len()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn get_record(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<JsonMap>, StoreError> {
        Ok(self
            .records
            .lock()
            .get(collection)
            .and_then(|coll| coll.get(key))
            .cloned())
    }

    async fn put_record(
        &self,
        collection: &str,
        key: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError> {
        self.records
            .lock()
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), fields);
        Ok(())
    }

    async fn delete_record(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        if let Some(coll) = self.records.lock().get_mut(collection) {
            coll.remove(key);
        }
        Ok(())
    }

    async fn list_records(&self, collection: &str) -> Result<Vec<(String, JsonMap)>, StoreError> {
        Ok(self
            .records
            .lock()
            .get(collection)
            .map(|coll| {
                coll.iter()
                    .map(|(key, fields)| (key.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn upload_blob(&self, key: &str, bytes: Bytes) -> Result<String, StoreError> {
        self.blobs.lock().insert(key.to_string(), bytes);
        Ok(key.to_string())
    }

    async fn blob_url(&self, handle: &str) -> Result<String, StoreError> {
        if !self.blobs.lock().contains_key(handle) {
            return Err(StoreError::BlobMissing(handle.to_string()));
        }
        Ok(format!("{}{}", URL_SCHEME, handle))
    }

    async fn delete_blob(&self, handle_or_url: &str) -> Result<(), StoreError> {
        let key = handle_or_url.strip_prefix(URL_SCHEME).unwrap_or(handle_or_url);
        match self.blobs.lock().remove(key) {
            Some(_) => Ok(()),
            None => Err(StoreError::BlobMissing(key.to_string())),
        }
    }
}
