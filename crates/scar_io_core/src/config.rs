//! Process environment configuration.
//!
//! Every variable is read once into [`StepConfig`], which is then passed by
//! reference to the step driver. Empty values are treated as absent.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::context::InvocationContext;
use crate::error::ScarIoError;

pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const STEP: &str = "STEP";
pub const SCAR_INPUT_DIR: &str = "SCAR_INPUT_DIR";
pub const SCAR_OUTPUT_DIR: &str = "SCAR_OUTPUT_DIR";
pub const SCRIPT: &str = "SCRIPT";
pub const INPUT_BUCKET: &str = "INPUT_BUCKET";
pub const OUTPUT_BUCKET: &str = "OUTPUT_BUCKET";
pub const OUTPUT_FOLDER: &str = "OUTPUT_FOLDER";
pub const OUTPUT_PUBLIC_READ: &str = "OUTPUT_PUBLIC_READ";
pub const EVENT: &str = "EVENT";
pub const REQUEST_ID: &str = "REQUEST_ID";
pub const AWS_LAMBDA_REQUEST_ID: &str = "AWS_LAMBDA_REQUEST_ID";
pub const AWS_LAMBDA_FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";

pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_REQUEST_ID: &str = "local";
pub const DEFAULT_FUNCTION_NAME: &str = "scar";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Init,
    End,
}

impl Step {
    pub fn parse(value: &str) -> Result<Self, ScarIoError> {
        match value.trim() {
            "INIT" => Ok(Self::Init),
            "END" => Ok(Self::End),
            other => Err(ScarIoError::InvalidStep(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::End => "END",
        }
    }
}

/// Reads a variable from the process environment, returning `None` when it
/// is unset or empty.
pub fn env_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepConfig {
    pub log_level: String,
    pub step: Step,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub script: Option<String>,
    pub input_bucket: Option<String>,
    pub output_bucket: Option<String>,
    pub output_folder: Option<String>,
    pub public_read: bool,
    pub event: Value,
    pub request_id: String,
    pub function_name: String,
}

impl StepConfig {
    pub fn from_env() -> Result<Self, ScarIoError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Only `STEP` is validated here. Directories and the script body are
    /// checked by the step that needs them, so an `END` run never requires
    /// `SCRIPT`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ScarIoError> {
        let var = |name: &str| non_empty(lookup(name));

        let step = var(STEP)
            .ok_or(ScarIoError::MissingEnv(STEP))
            .and_then(|value| Step::parse(&value))?;

        let event = match var(EVENT) {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Value::Object(Default::default()),
        };

        Ok(Self {
            log_level: var(LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            step,
            input_dir: var(SCAR_INPUT_DIR).map(PathBuf::from),
            output_dir: var(SCAR_OUTPUT_DIR).map(PathBuf::from),
            // An empty script is still a script.
            script: lookup(SCRIPT),
            input_bucket: var(INPUT_BUCKET),
            output_bucket: var(OUTPUT_BUCKET),
            output_folder: var(OUTPUT_FOLDER),
            public_read: var(OUTPUT_PUBLIC_READ)
                .map(|value| parse_flag(&value))
                .unwrap_or(true),
            event,
            request_id: var(REQUEST_ID)
                .or_else(|| var(AWS_LAMBDA_REQUEST_ID))
                .unwrap_or_else(|| DEFAULT_REQUEST_ID.to_string()),
            function_name: var(AWS_LAMBDA_FUNCTION_NAME)
                .unwrap_or_else(|| DEFAULT_FUNCTION_NAME.to_string()),
        })
    }

    pub fn input_dir(&self) -> Result<&Path, ScarIoError> {
        self.input_dir
            .as_deref()
            .ok_or(ScarIoError::MissingEnv(SCAR_INPUT_DIR))
    }

    pub fn output_dir(&self) -> Result<&Path, ScarIoError> {
        self.output_dir
            .as_deref()
            .ok_or(ScarIoError::MissingEnv(SCAR_OUTPUT_DIR))
    }

    pub fn script(&self) -> Result<&str, ScarIoError> {
        self.script.as_deref().ok_or(ScarIoError::MissingEnv(SCRIPT))
    }

    pub fn invocation_context(&self) -> InvocationContext {
        InvocationContext {
            event: self.event.clone(),
            input_folder: self.input_dir.clone().unwrap_or_default(),
            output_folder: self.output_dir.clone().unwrap_or_default(),
            request_id: self.request_id.clone(),
            function_name: self.function_name.clone(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
