use std::path::Path;

use scar_io_core::error::StoreError;

/// Canned access policy applied to an object after upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

impl ObjectAcl {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
        }
    }
}

/// Blocking object storage operations used by the step driver.
///
/// Every call is a single attempt; implementations must not retry.
pub trait ObjectStore {
    /// Streams `bucket/key` into `path`, truncating it, and returns the
    /// number of bytes written.
    fn download_to_file(&self, bucket: &str, key: &str, path: &Path) -> Result<u64, StoreError>;

    fn upload_from_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError>;

    fn set_object_acl(&self, bucket: &str, key: &str, acl: ObjectAcl) -> Result<(), StoreError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError>;

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;
}
