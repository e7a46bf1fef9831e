//! Remote store contract consumed by the inventory repository
//!
//! The hosted backend is reached exclusively through this trait, injected as
//! an explicit dependency rather than a module-level singleton, so tests can
//! substitute [`crate::store::MemoryStore`] for the real REST client.

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

/// Flat record fields as a JSON object
pub type JsonMap = serde_json::Map<String, Value>;

/// Narrow read/write/delete contract over the document database and blob storage
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch a single record, `None` if absent
    async fn get_record(&self, collection: &str, key: &str)
        -> Result<Option<JsonMap>, StoreError>;

    /// Full overwrite of the named record's fields
    async fn put_record(
        &self,
        collection: &str,
        key: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError>;

    /// Delete the named record
    async fn delete_record(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// All records in the collection, in whatever order the store returns them
    async fn list_records(&self, collection: &str) -> Result<Vec<(String, JsonMap)>, StoreError>;

    /// Upload a blob under `key`, overwriting any previous payload.
    /// Returns an opaque handle for the stored object.
    async fn upload_blob(&self, key: &str, bytes: Bytes) -> Result<String, StoreError>;

    /// Retrieval URL for a previously uploaded blob
    async fn blob_url(&self, handle: &str) -> Result<String, StoreError>;

    /// Delete a blob, addressed by handle or retrieval URL.
    /// An absent blob is an error; callers log it rather than propagate.
    async fn delete_blob(&self, handle_or_url: &str) -> Result<(), StoreError>;
}

/// Remote store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),

    #[error("Blob not found: {0}")]
    BlobMissing(String),
}
