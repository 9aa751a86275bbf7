use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use scar_io_core::error::StoreError;

use crate::adapters::object_store::{ObjectAcl, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Download { bucket: String, key: String },
    Upload { bucket: String, key: String },
    SetAcl { bucket: String, key: String, acl: ObjectAcl },
    Delete { bucket: String, key: String },
    Get { bucket: String, key: String },
}

/// In-memory object store that records every call it receives.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    acls: Mutex<HashMap<(String, String), ObjectAcl>>,
    calls: Mutex<Vec<StoreCall>>,
    reject_acl: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_acl() -> Self {
        Self {
            reject_acl: true,
            ..Self::default()
        }
    }

    pub fn seed_object(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn acl(&self, bucket: &str, key: &str) -> Option<ObjectAcl> {
        self.acls
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .copied()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn upload_keys(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Upload { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.object(bucket, key)
            .ok_or_else(|| StoreError::not_found(bucket, key))
    }
}

impl ObjectStore for MemoryStore {
    fn download_to_file(&self, bucket: &str, key: &str, path: &Path) -> Result<u64, StoreError> {
        self.record(StoreCall::Download {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        let body = self.read(bucket, key)?;
        fs::write(path, &body).map_err(|source| StoreError::LocalIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(body.len() as u64)
    }

    fn upload_from_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError> {
        self.record(StoreCall::Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        let body = fs::read(path).map_err(|source| StoreError::LocalIo {
            path: path.to_path_buf(),
            source,
        })?;
        self.seed_object(bucket, key, &body);
        Ok(())
    }

    fn set_object_acl(&self, bucket: &str, key: &str, acl: ObjectAcl) -> Result<(), StoreError> {
        self.record(StoreCall::SetAcl {
            bucket: bucket.to_string(),
            key: key.to_string(),
            acl,
        });
        if self.reject_acl {
            return Err(StoreError::transport(
                "put_object_acl",
                bucket,
                key,
                "AccessDenied: acl updates are blocked",
            ));
        }
        self.acls
            .lock()
            .expect("poisoned mutex")
            .insert((bucket.to_string(), key.to_string()), acl);
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.objects
            .lock()
            .expect("poisoned mutex")
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.record(StoreCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        self.read(bucket, key)
    }
}
