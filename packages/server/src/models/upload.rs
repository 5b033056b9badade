use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content types a document attachment may have.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/png",
    "image/jpeg",
    "image/webp",
];

/// Request for a client-direct upload credential.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadTokenRequest {
    /// Document the file will be attached to. Must be owned by the caller.
    #[schema(example = 42)]
    pub document_id: i32,
    /// Client-side file name; a flat name without directories.
    #[schema(example = "policy.pdf")]
    pub file_name: String,
    /// MIME type. Guessed from `fileName` when absent.
    #[schema(example = "application/pdf")]
    pub content_type: Option<String>,
    /// Declared size in bytes.
    #[schema(example = 183_204)]
    pub file_size: Option<i64>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadTokenResponse {
    /// Presigned URL to `PUT` the file bytes to.
    pub upload_url: String,
    /// Headers the `PUT` must send unchanged; they are part of the signature.
    pub upload_headers: BTreeMap<String, String>,
    /// Object key the file will be stored under.
    #[schema(example = "documents/42/0190f5c4-passport.pdf")]
    pub pathname: String,
    /// Opaque token to hand back on completion.
    pub callback_token: String,
    pub allowed_content_types: Vec<String>,
    #[schema(example = 26_214_400)]
    pub maximum_size_in_bytes: u64,
    /// When the upload URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// Completion notice sent once the object is in the store.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadCompletedRequest {
    /// Final public URL of the object. Derived from `pathname` when empty.
    #[serde(default)]
    pub url: String,
    /// Object key within the bucket.
    pub pathname: String,
    /// The `callbackToken` minted with the upload credential.
    pub token_payload: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadCompletedResponse {
    /// Whether a document's file metadata was updated.
    pub updated: bool,
}

/// Resolve the content type of an upload, falling back to the file extension.
pub fn resolve_content_type(declared: Option<&str>, file_name: &str) -> Option<String> {
    declared
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty())
        .or_else(|| {
            mime_guess::from_path(file_name)
                .first()
                .map(|m| m.essence_str().to_string())
        })
}

pub fn is_allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}
