use serde::Deserialize;

/// Blob storage configuration for presigned client-direct uploads.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Bucket that receives uploaded documents.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Signing region. Default: "us-east-1".
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint. Default: "http://localhost:9000".
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    /// Lifetime of a presigned upload URL in seconds. Default: 900.
    #[serde(default = "default_presign_expiry_secs")]
    pub presign_expiry_secs: u32,
    /// Largest accepted upload in bytes. Default: 25 MiB.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
    /// Address objects as `{endpoint}/{bucket}/{key}`. Default: true.
    #[serde(default = "default_path_style")]
    pub path_style: bool,
}

fn default_bucket() -> String {
    "docuexpiry".into()
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_endpoint() -> String {
    "http://localhost:9000".into()
}
fn default_presign_expiry_secs() -> u32 {
    900
}
fn default_max_upload_size() -> u64 {
    25 * 1024 * 1024
}
fn default_path_style() -> bool {
    true
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            region: default_region(),
            endpoint: default_endpoint(),
            access_key: String::new(),
            secret_key: String::new(),
            presign_expiry_secs: default_presign_expiry_secs(),
            max_upload_size: default_max_upload_size(),
            path_style: default_path_style(),
        }
    }
}
