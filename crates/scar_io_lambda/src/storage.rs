//! Download and upload operations between the object store and the local
//! working directories of an invocation.

use std::fs;
use std::path::{Path, PathBuf};

use scar_io_core::context::{DownloadTarget, InvocationContext};
use scar_io_core::error::ScarIoError;
use scar_io_core::fs_utils::list_files_recursive;
use scar_io_core::storage_keys::{default_output_object_key, output_object_key, relative_file_name};
use tracing::{debug, info};

use crate::adapters::object_store::{ObjectAcl, ObjectStore};

pub struct StorageWrapper<'a, S: ObjectStore> {
    store: &'a S,
    context: Option<&'a InvocationContext>,
    target: Option<DownloadTarget>,
    upload_acl: Option<ObjectAcl>,
}

impl<'a, S: ObjectStore> StorageWrapper<'a, S> {
    /// Derives the download target from the first storage record of the
    /// context's event, if any. Uploaded objects are made public-read unless
    /// [`Self::with_upload_acl`] says otherwise.
    pub fn new(store: &'a S, context: Option<&'a InvocationContext>) -> Self {
        let target = context.and_then(InvocationContext::download_target);
        Self {
            store,
            context,
            target,
            upload_acl: Some(ObjectAcl::PublicRead),
        }
    }

    pub fn with_upload_acl(mut self, acl: Option<ObjectAcl>) -> Self {
        self.upload_acl = acl;
        self
    }

    pub fn target(&self) -> Option<&DownloadTarget> {
        self.target.as_ref()
    }

    fn require_target(&self) -> Result<&DownloadTarget, ScarIoError> {
        self.target.as_ref().ok_or(ScarIoError::NoStorageRecord)
    }

    /// Downloads the record's object into the input folder and returns the
    /// local path.
    pub fn download_input(&self) -> Result<PathBuf, ScarIoError> {
        let target = self.require_target()?;
        let bucket = &target.record.bucket;
        let key = &target.record.key;
        let path = &target.download_path;

        info!(bucket = %bucket, key = %key, "downloading input object");
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ScarIoError::io(parent, source))?;
        }

        let bytes = self.store.download_to_file(bucket, key, path)?;
        info!(
            bucket = %bucket,
            key = %key,
            path = %path.display(),
            bytes,
            "downloaded input object"
        );
        Ok(path.clone())
    }

    /// Uploads every file under the output folder and returns the keys used.
    ///
    /// Keys are `{bucket_folder}/{request_id}/{file}` when a folder is given,
    /// otherwise `{function_name}/output/{request_id}/{file}`.
    pub fn upload_output(
        &self,
        bucket: &str,
        bucket_folder: Option<&str>,
    ) -> Result<Vec<String>, ScarIoError> {
        let context = self.context.ok_or(ScarIoError::MissingContext)?;
        let files = list_files_recursive(&context.output_folder)?;
        debug!(file_count = files.len(), files = ?files, "uploading output files");

        let mut keys = Vec::with_capacity(files.len());
        for file_path in files {
            let file_name = relative_file_name(&context.output_folder, &file_path);
            let key = match bucket_folder {
                Some(folder) => output_object_key(None, folder, &context.request_id, &file_name),
                None => default_output_object_key(
                    &context.function_name,
                    &context.request_id,
                    &file_name,
                ),
            };
            self.upload_file(bucket, &file_path, &key)?;
            keys.push(key);
        }
        Ok(keys)
    }

    pub fn upload_file(&self, bucket: &str, path: &Path, key: &str) -> Result<(), ScarIoError> {
        info!(bucket = %bucket, key = %key, path = %path.display(), "uploading file");
        self.store.upload_from_file(bucket, key, path)?;

        if let Some(acl) = self.upload_acl {
            info!(bucket = %bucket, key = %key, acl = acl.as_str(), "changing object acl");
            self.store.set_object_acl(bucket, key, acl)?;
        }
        Ok(())
    }

    pub fn download_file_to_memory(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ScarIoError> {
        info!(bucket = %bucket, key = %key, "reading object into memory");
        Ok(self.store.get_object(bucket, key)?)
    }

    /// Deletes the object named by the invocation's storage record.
    pub fn delete_file(&self) -> Result<(), ScarIoError> {
        let target = self.require_target()?;
        info!(bucket = %target.record.bucket, key = %target.record.key, "deleting object");
        Ok(self
            .store
            .delete_object(&target.record.bucket, &target.record.key)?)
    }
}
