use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Audience stamped on upload callback tokens so they can never pass as a
/// session and vice versa.
pub const UPLOAD_AUDIENCE: &str = "docuexpiry:upload";

/// Session claims issued by the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: usize, // Expiration timestamp
}

/// Opaque correlation payload minted with an upload token and handed back by
/// the storage provider on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadClaims {
    pub aud: String,
    pub uid: String,
    pub document_id: i32,
    /// Object key the upload was authorized for.
    pub pathname: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub file_type: Option<String>,
    pub exp: usize,
}

/// Sign any claim set with the shared HMAC secret.
pub fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String> {
    let token = encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify and decode a session token.
pub fn verify_session(token: &str, secret: &str) -> Result<SessionClaims> {
    let mut validation = Validation::default();
    validation.validate_aud = false;
    decode_with(token, secret, &validation)
}

/// Verify and decode an upload callback token.
pub fn verify_upload(token: &str, secret: &str) -> Result<UploadClaims> {
    let mut validation = Validation::default();
    validation.set_audience(&[UPLOAD_AUDIENCE]);
    decode_with(token, secret, &validation)
}

fn decode_with<T: DeserializeOwned>(token: &str, secret: &str, validation: &Validation) -> Result<T> {
    let token_data = decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        validation,
    )?;
    Ok(token_data.claims)
}
