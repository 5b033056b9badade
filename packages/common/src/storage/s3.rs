use async_trait::async_trait;
use chrono::{Duration, Utc};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};
use s3::Region;
use s3::bucket::Bucket;
use s3::creds::Credentials;

use super::error::StorageError;
use super::traits::{PresignedUpload, UploadRestrictions, UploadSigner, validate_object_key};
use crate::config::StorageConfig;

/// Presigns uploads against any S3-compatible store (AWS, MinIO, R2).
///
/// Signing is a local computation; no request reaches the store until the
/// client uses the URL.
pub struct S3UploadSigner {
    bucket: Box<Bucket>,
    endpoint: String,
    path_style: bool,
}

impl S3UploadSigner {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Config(e.to_string()))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            path_style: config.path_style,
        })
    }
}

/// Headers folded into the presigned signature.
fn signed_headers(restrictions: &UploadRestrictions) -> Result<HeaderMap, StorageError> {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&restrictions.content_type)
        .map_err(|e| StorageError::Backend(format!("invalid content type: {e}")))?;
    headers.insert(CONTENT_TYPE, content_type);
    if let Some(len) = restrictions.content_length {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    }
    Ok(headers)
}

#[async_trait]
impl UploadSigner for S3UploadSigner {
    async fn presign_put(
        &self,
        key: &str,
        restrictions: &UploadRestrictions,
        expires_in_secs: u32,
    ) -> Result<PresignedUpload, StorageError> {
        validate_object_key(key)?;

        let url = self
            .bucket
            .presign_put(
                key,
                expires_in_secs,
                Some(signed_headers(restrictions)?),
                None,
            )
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(
            key,
            content_type = %restrictions.content_type,
            expires_in_secs,
            "Presigned upload URL"
        );

        Ok(PresignedUpload {
            url,
            headers: restrictions.headers(),
            expires_at: Utc::now() + Duration::seconds(i64::from(expires_in_secs)),
        })
    }

    fn object_url(&self, key: &str) -> String {
        if self.path_style {
            format!("{}/{}/{}", self.endpoint, self.bucket.name(), key)
        } else {
            match self.endpoint.split_once("://") {
                Some((scheme, host)) => {
                    format!("{scheme}://{}.{host}/{key}", self.bucket.name())
                }
                None => format!("{}.{}/{key}", self.bucket.name(), self.endpoint),
            }
        }
    }
}
