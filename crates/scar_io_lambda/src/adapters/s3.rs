use std::future::Future;
use std::path::Path;

use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use scar_io_core::error::StoreError;
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::adapters::object_store::{ObjectAcl, ObjectStore};

/// [`ObjectStore`] backed by `aws-sdk-s3`.
///
/// The SDK client is built from the default credential chain on first use
/// and reused for every later call. Calls must run on a multi-threaded tokio
/// runtime.
#[derive(Debug, Default)]
pub struct S3ObjectStore {
    client: OnceCell<aws_sdk_s3::Client>,
}

impl S3ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: aws_sdk_s3::Client) -> Self {
        Self {
            client: OnceCell::new_with(Some(client)),
        }
    }

    async fn client(&self) -> &aws_sdk_s3::Client {
        self.client
            .get_or_init(|| async {
                debug!("building s3 client from default aws configuration");
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                aws_sdk_s3::Client::new(&aws_config)
            })
            .await
    }
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn local_io(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::LocalIo {
        path: path.to_path_buf(),
        source,
    }
}

fn get_object_error(
    bucket: &str,
    key: &str,
    error: aws_sdk_s3::error::SdkError<GetObjectError>,
) -> StoreError {
    if error
        .as_service_error()
        .is_some_and(GetObjectError::is_no_such_key)
    {
        StoreError::not_found(bucket, key)
    } else {
        StoreError::transport("get_object", bucket, key, aws_sdk_s3::Error::from(error))
    }
}

impl ObjectStore for S3ObjectStore {
    fn download_to_file(&self, bucket: &str, key: &str, path: &Path) -> Result<u64, StoreError> {
        block_on(async {
            let response = self
                .client()
                .await
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|error| get_object_error(bucket, key, error))?;

            let mut file = tokio::fs::File::create(path)
                .await
                .map_err(|source| local_io(path, source))?;
            let mut body = response.body;
            let mut written = 0u64;
            while let Some(chunk) = body
                .try_next()
                .await
                .map_err(|error| StoreError::transport("get_object", bucket, key, error))?
            {
                file.write_all(&chunk)
                    .await
                    .map_err(|source| local_io(path, source))?;
                written += chunk.len() as u64;
            }
            file.flush().await.map_err(|source| local_io(path, source))?;
            Ok(written)
        })
    }

    fn upload_from_file(&self, bucket: &str, key: &str, path: &Path) -> Result<(), StoreError> {
        block_on(async {
            let body = ByteStream::from_path(path)
                .await
                .map_err(|error| local_io(path, std::io::Error::other(error)))?;

            self.client()
                .await
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    StoreError::transport("put_object", bucket, key, aws_sdk_s3::Error::from(error))
                })
        })
    }

    fn set_object_acl(&self, bucket: &str, key: &str, acl: ObjectAcl) -> Result<(), StoreError> {
        let canned = match acl {
            ObjectAcl::Private => ObjectCannedAcl::Private,
            ObjectAcl::PublicRead => ObjectCannedAcl::PublicRead,
        };

        block_on(async {
            self.client()
                .await
                .put_object_acl()
                .bucket(bucket)
                .key(key)
                .acl(canned)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    StoreError::transport(
                        "put_object_acl",
                        bucket,
                        key,
                        aws_sdk_s3::Error::from(error),
                    )
                })
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), StoreError> {
        block_on(async {
            self.client()
                .await
                .delete_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| {
                    StoreError::transport(
                        "delete_object",
                        bucket,
                        key,
                        aws_sdk_s3::Error::from(error),
                    )
                })
        })
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        block_on(async {
            let response = self
                .client()
                .await
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|error| get_object_error(bucket, key, error))?;

            let data = response
                .body
                .collect()
                .await
                .map_err(|error| StoreError::transport("get_object", bucket, key, error))?;
            Ok(data.into_bytes().to_vec())
        })
    }
}
