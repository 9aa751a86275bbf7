use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised by an object store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object s3://{bucket}/{key} does not exist")]
    NotFound { bucket: String, key: String },

    #[error("{operation} on s3://{bucket}/{key} failed: {source}")]
    Transport {
        operation: &'static str,
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("local file {}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub fn transport(
        operation: &'static str,
        bucket: &str,
        key: &str,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Transport {
            operation,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub fn not_found(bucket: &str, key: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScarIoError {
    #[error("{0} must be configured")]
    MissingEnv(&'static str),

    #[error("unsupported STEP value '{0}', expected INIT or END")]
    InvalidStep(String),

    #[error("invalid invocation event: {0}")]
    InvalidEvent(#[from] serde_json::Error),

    #[error("invocation event carries no storage record to operate on")]
    NoStorageRecord,

    #[error("no invocation context available for output upload")]
    MissingContext,

    #[error("filesystem error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ScarIoError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
