//! INIT/END step driver.
//!
//! `INIT` materializes the user script and stages the input object, `END`
//! publishes the output folder. Both halves are no-ops on the store when the
//! corresponding bucket variable is absent.

use std::path::{Path, PathBuf};

use scar_io_core::config::{Step, StepConfig};
use scar_io_core::error::ScarIoError;
use scar_io_core::fs_utils::{join_paths, write_executable_script};
use tracing::info;

use crate::adapters::object_store::{ObjectAcl, ObjectStore};
use crate::storage::StorageWrapper;

pub const SCRIPT_FILE_NAME: &str = "script.sh";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Initialized {
        script_path: PathBuf,
        downloaded: Option<PathBuf>,
    },
    Finished {
        uploaded_keys: Vec<String>,
    },
}

pub fn run_step(config: &StepConfig, store: &impl ObjectStore) -> Result<StepOutcome, ScarIoError> {
    info!(step = config.step.as_str(), "running step");
    match config.step {
        Step::Init => {
            let script_path = create_user_script(config)?;
            let downloaded = manage_input_bucket(config, store)?;
            Ok(StepOutcome::Initialized {
                script_path,
                downloaded,
            })
        }
        Step::End => Ok(StepOutcome::Finished {
            uploaded_keys: manage_output_bucket(config, store)?,
        }),
    }
}

pub fn create_user_script(config: &StepConfig) -> Result<PathBuf, ScarIoError> {
    let script_path = join_paths([config.input_dir()?, Path::new(SCRIPT_FILE_NAME)]);
    write_executable_script(&script_path, config.script()?)?;
    info!(path = %script_path.display(), "user script written");
    Ok(script_path)
}

fn manage_input_bucket(
    config: &StepConfig,
    store: &impl ObjectStore,
) -> Result<Option<PathBuf>, ScarIoError> {
    let Some(input_bucket) = config.input_bucket.as_deref() else {
        return Ok(None);
    };
    info!(input_bucket = %input_bucket, "input bucket configured");

    let context = config.invocation_context();
    let downloaded = StorageWrapper::new(store, Some(&context)).download_input()?;
    Ok(Some(downloaded))
}

fn manage_output_bucket(
    config: &StepConfig,
    store: &impl ObjectStore,
) -> Result<Vec<String>, ScarIoError> {
    let Some(output_bucket) = config.output_bucket.as_deref() else {
        return Ok(Vec::new());
    };
    let output_dir = config.output_dir()?;
    info!(
        output_bucket = %output_bucket,
        output_dir = %output_dir.display(),
        "output bucket configured"
    );

    let context = config.invocation_context();
    let upload_acl = config.public_read.then_some(ObjectAcl::PublicRead);
    let keys = StorageWrapper::new(store, Some(&context))
        .with_upload_acl(upload_acl)
        .upload_output(output_bucket, config.output_folder.as_deref())?;
    info!(output_bucket = %output_bucket, uploaded = keys.len(), "output folder uploaded");
    Ok(keys)
}
