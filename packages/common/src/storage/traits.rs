use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StorageError;

/// Request properties a presigned `PUT` is bound to besides its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRestrictions {
    pub content_type: String,
    /// Exact body size in bytes, when the client declared one.
    pub content_length: Option<u64>,
}

impl UploadRestrictions {
    /// Headers the client must send verbatim for the signature to match.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), self.content_type.clone());
        if let Some(len) = self.content_length {
            headers.insert("content-length".to_string(), len.to_string());
        }
        headers
    }
}

/// A presigned URL that lets a client write one object directly to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUpload {
    /// URL the client sends its `PUT` request to.
    pub url: String,
    /// Signed headers the `PUT` must carry unchanged.
    pub headers: BTreeMap<String, String>,
    /// Instant after which the store rejects the URL.
    pub expires_at: DateTime<Utc>,
}

/// Issues short-lived upload credentials for client-direct transfers.
///
/// The server never sees file bytes: it mints a scoped URL, the client uploads
/// to it, and the store reports completion back to the server.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    /// Presign a `PUT` for `key`, valid for `expires_in_secs` seconds.
    ///
    /// The signature covers the headers in `restrictions`, so the store
    /// refuses a body of another type or size.
    async fn presign_put(
        &self,
        key: &str,
        restrictions: &UploadRestrictions,
        expires_in_secs: u32,
    ) -> Result<PresignedUpload, StorageError>;

    /// Public URL an uploaded object is served from.
    fn object_url(&self, key: &str) -> String;
}

/// Reject keys that are empty, absolute, or contain traversal segments.
pub fn validate_object_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("key must not be empty".into()));
    }
    if key.starts_with('/') {
        return Err(StorageError::InvalidKey(format!("{key}: absolute keys are not allowed")));
    }
    if key.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(StorageError::InvalidKey(format!("{key}: empty or '..' segment")));
    }
    Ok(())
}
