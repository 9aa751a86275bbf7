use std::path::PathBuf;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use tracing::{debug, warn};

/// Metadata of the enclosing invocation. Read-only to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationContext {
    pub event: Value,
    pub input_folder: PathBuf,
    pub output_folder: PathBuf,
    pub request_id: String,
    pub function_name: String,
}

/// Bucket and decoded key taken from the first storage notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRecord {
    pub bucket: String,
    pub key: String,
}

/// Where the object named by a [`StorageRecord`] lands on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub record: StorageRecord,
    pub file_name: String,
    pub download_path: PathBuf,
}

impl InvocationContext {
    pub fn storage_record(&self) -> Option<StorageRecord> {
        StorageRecord::from_event(&self.event)
    }

    pub fn download_target(&self) -> Option<DownloadTarget> {
        let record = self.storage_record()?;
        let file_name = sanitize_file_name(&record.key);
        let download_path = self.input_folder.join(&file_name);
        Some(DownloadTarget {
            record,
            file_name,
            download_path,
        })
    }
}

impl StorageRecord {
    /// Extracts the `s3` entity of the first element of `Records`.
    ///
    /// Additional records are ignored with a warning.
    pub fn from_event(event: &Value) -> Option<Self> {
        let records = event
            .get("Records")
            .and_then(Value::as_array)
            .filter(|records| !records.is_empty())?;

        if records.len() > 1 {
            warn!(
                record_count = records.len(),
                "multiple records detected, only processing the first one"
            );
        }

        let Some(entity) = records[0].get("s3") else {
            debug!("first record carries no s3 entity");
            return None;
        };

        let bucket = entity
            .get("bucket")
            .and_then(|bucket| bucket.get("name"))
            .and_then(Value::as_str);
        let key = entity
            .get("object")
            .and_then(|object| object.get("key"))
            .and_then(Value::as_str);

        match (bucket, key) {
            (Some(bucket), Some(key)) => Some(Self {
                bucket: bucket.to_string(),
                key: unquote_plus(key),
            }),
            _ => {
                warn!("s3 record is missing bucket name or object key");
                None
            }
        }
    }
}

/// Decodes an object key as delivered in notification events: `+` stands for
/// a space and everything else is percent-encoded.
pub fn unquote_plus(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Base name of `key` with every space removed.
pub fn sanitize_file_name(key: &str) -> String {
    let base = key.rsplit('/').next().unwrap_or(key);
    base.replace(' ', "")
}
