//! Storage step domain primitives.
//!
//! This crate owns environment configuration, invocation context parsing,
//! object key conventions and local filesystem helpers. It intentionally
//! excludes AWS SDK and async runtime concerns.

pub mod config;
pub mod context;
pub mod error;
pub mod fs_utils;
pub mod storage_keys;
