//! Firebase REST API client (Firestore documents + Cloud Storage objects)
//!
//! Talks to the hosted backend with the project's web API key; there is no
//! per-user auth in this deployment. Firestore wraps every field in a typed
//! value object, so flat record fields are translated on the way in and out.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::remote::{JsonMap, RemoteStore, StoreError};
use crate::config::Config;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";
const STORAGE_HOST: &str = "https://firebasestorage.googleapis.com/v0";

/// Firebase client for document and blob operations
#[derive(Clone)]
pub struct FirebaseClient {
    client: Client,
    project_id: String,
    api_key: String,
    storage_bucket: String,
}

impl FirebaseClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            project_id: config.firebase_project_id.clone(),
            api_key: config.firebase_api_key.clone(),
            storage_bucket: config.firebase_storage_bucket.clone(),
        }
    }

    /// Firestore REST URL for a collection
    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_HOST, self.project_id, collection
        )
    }

    /// Firestore REST URL for a single document
    fn doc_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{}", self.collection_url(collection), encode_component(key))
    }

    /// Cloud Storage REST URL for an object path
    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o/{}",
            STORAGE_HOST,
            self.storage_bucket,
            encode_component(path)
        )
    }

    /// Check an HTTP response status, turning failures into `StoreError::Api`
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status: status.as_u16(), body });
        }
        Ok(response)
    }

    /// Fetch storage object metadata (used to mint download URLs)
    async fn object_metadata(&self, path: &str) -> Result<ObjectMetadata, StoreError> {
        let url = format!("{}?key={}", self.object_url(path), self.api_key);

        let response = self.client.get(&url).send().await.map_err(StoreError::Request)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::BlobMissing(path.to_string()));
        }

        let response = Self::check(response).await?;
        response.json().await.map_err(StoreError::Parse)
    }
}

#[async_trait]
impl RemoteStore for FirebaseClient {
    async fn get_record(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<JsonMap>, StoreError> {
        let url = format!("{}?key={}", self.doc_url(collection, key), self.api_key);

        let response = self.client.get(&url).send().await.map_err(StoreError::Request)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = Self::check(response).await?;
        let doc: FirestoreDocument = response.json().await.map_err(StoreError::Parse)?;
        Ok(Some(from_firestore_fields(&doc.fields)))
    }

    async fn put_record(
        &self,
        collection: &str,
        key: &str,
        fields: JsonMap,
    ) -> Result<(), StoreError> {
        // PATCH without an update mask replaces the whole document,
        // creating it if absent
        let url = format!("{}?key={}", self.doc_url(collection, key), self.api_key);
        let body = json!({ "fields": to_firestore_fields(&fields) });

        let response = self
            .client
            .patch(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(StoreError::Request)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn delete_record(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        let url = format!("{}?key={}", self.doc_url(collection, key), self.api_key);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(StoreError::Request)?;

        Self::check(response).await?;
        Ok(())
    }

    async fn list_records(&self, collection: &str) -> Result<Vec<(String, JsonMap)>, StoreError> {
        let url = format!("{}?key={}", self.collection_url(collection), self.api_key);

        let response = self.client.get(&url).send().await.map_err(StoreError::Request)?;
        let response = Self::check(response).await?;

        let listing: ListDocumentsResponse = response.json().await.map_err(StoreError::Parse)?;
        Ok(listing
            .documents
            .iter()
            .map(|doc| (doc_id(&doc.name), from_firestore_fields(&doc.fields)))
            .collect())
    }

    async fn upload_blob(&self, key: &str, bytes: Bytes) -> Result<String, StoreError> {
        let url = format!(
            "{}/b/{}/o?uploadType=media&name={}&key={}",
            STORAGE_HOST,
            self.storage_bucket,
            encode_component(key),
            self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "image/png")
            .body(bytes)
            .send()
            .await
            .map_err(StoreError::Request)?;

        let response = Self::check(response).await?;
        let metadata: ObjectMetadata = response.json().await.map_err(StoreError::Parse)?;
        Ok(metadata.name)
    }

    async fn blob_url(&self, handle: &str) -> Result<String, StoreError> {
        let metadata = self.object_metadata(handle).await?;

        // The download token makes the URL fetchable without further auth
        let mut url = format!("{}?alt=media", self.object_url(&metadata.name));
        if let Some(tokens) = metadata.download_tokens {
            if let Some(token) = tokens.split(',').next() {
                url.push_str("&token=");
                url.push_str(token);
            }
        }
        Ok(url)
    }

    async fn delete_blob(&self, handle_or_url: &str) -> Result<(), StoreError> {
        let path = object_path(handle_or_url);
        let url = format!("{}?key={}", self.object_url(&path), self.api_key);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(StoreError::Request)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::BlobMissing(path));
        }

        Self::check(response).await?;
        Ok(())
    }
}

/// Storage object metadata (subset)
#[derive(Debug, Deserialize)]
struct ObjectMetadata {
    name: String,
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

/// Firestore document as returned by the REST API
#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: JsonMap,
}

#[derive(Debug, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
}

/// Document id: last segment of the resource name
fn doc_id(resource_name: &str) -> String {
    resource_name
        .rsplit('/')
        .next()
        .unwrap_or(resource_name)
        .to_string()
}

/// Wrap flat scalar fields in Firestore typed values
fn to_firestore_fields(fields: &JsonMap) -> JsonMap {
    let mut out = JsonMap::new();
    for (name, value) in fields {
        let typed = match value {
            Value::Null => json!({ "nullValue": null }),
            Value::Bool(b) => json!({ "booleanValue": b }),
            // Firestore transports 64-bit integers as decimal strings
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                json!({ "integerValue": n.to_string() })
            }
            Value::Number(n) => json!({ "doubleValue": n }),
            Value::String(s) => json!({ "stringValue": s }),
            // Records in this app are flat; nested values are not stored
            _ => continue,
        };
        out.insert(name.clone(), typed);
    }
    out
}

/// Unwrap Firestore typed values into flat scalar fields
fn from_firestore_fields(fields: &JsonMap) -> JsonMap {
    let mut out = JsonMap::new();
    for (name, typed) in fields {
        let value = if let Some(s) = typed.get("stringValue").and_then(Value::as_str) {
            Value::String(s.to_string())
        } else if let Some(s) = typed.get("integerValue").and_then(Value::as_str) {
            match s.parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => continue,
            }
        } else if let Some(d) = typed.get("doubleValue") {
            d.clone()
        } else if let Some(b) = typed.get("booleanValue").and_then(Value::as_bool) {
            Value::Bool(b)
        } else if typed.get("nullValue").is_some() {
            Value::Null
        } else {
            continue;
        };
        out.insert(name.clone(), value);
    }
    out
}

/// Percent-encode a path component for the REST APIs (slashes included)
fn encode_component(component: &str) -> String {
    let mut out = String::with_capacity(component.len());
    for byte in component.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Decode a percent-encoded path component
fn decode_component(component: &str) -> String {
    let bytes = component.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (
                (bytes[i + 1] as char).to_digit(16),
                (bytes[i + 2] as char).to_digit(16),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Extract the storage object path from a handle or download URL
fn object_path(handle_or_url: &str) -> String {
    if let Some(rest) = handle_or_url
        .strip_prefix("https://")
        .or_else(|| handle_or_url.strip_prefix("http://"))
    {
        if let Some(idx) = rest.find("/o/") {
            let path = &rest[idx + 3..];
            let path = path.split('?').next().unwrap_or(path);
            return decode_component(path);
        }
    }
    handle_or_url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_object_paths() {
        assert_eq!(encode_component("images/green apple.png"), "images%2Fgreen%20apple.png");
        assert_eq!(encode_component("plain-item_1.png"), "plain-item_1.png");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let path = "images/caffè latte.png";
        assert_eq!(decode_component(&encode_component(path)), path);
    }

    #[test]
    fn extracts_object_path_from_download_url() {
        let url = "https://firebasestorage.googleapis.com/v0/b/demo.appspot.com\
                   /o/images%2Fapple.png?alt=media&token=abc";
        assert_eq!(object_path(url), "images/apple.png");
        // Bare handles pass through untouched
        assert_eq!(object_path("images/apple.png"), "images/apple.png");
    }

    #[test]
    fn maps_fields_to_firestore_and_back() {
        let mut fields = JsonMap::new();
        fields.insert("quantity".into(), json!(3));
        fields.insert("imageURL".into(), json!("https://example/img.png"));

        let typed = to_firestore_fields(&fields);
        assert_eq!(typed["quantity"], json!({ "integerValue": "3" }));
        assert_eq!(typed["imageURL"], json!({ "stringValue": "https://example/img.png" }));

        assert_eq!(from_firestore_fields(&typed), fields);
    }

    #[test]
    fn doc_id_is_last_resource_segment() {
        let name = "projects/demo/databases/(default)/documents/inventory/apple";
        assert_eq!(doc_id(name), "apple");
    }
}
