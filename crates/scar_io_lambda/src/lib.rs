//! AWS-oriented adapters and the step driver for storage staging.
//!
//! This crate owns runtime integration details (the S3 object store adapter,
//! log subscriber setup and the INIT/END step driver) on top of the domain
//! primitives in `scar_io_core`.

pub mod adapters;
pub mod handlers;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
