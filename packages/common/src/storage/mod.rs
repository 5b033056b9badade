mod error;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3;

pub use error::StorageError;
pub use traits::{PresignedUpload, UploadRestrictions, UploadSigner, validate_object_key};
