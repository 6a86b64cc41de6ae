//! Construction-time and adapter-level errors.
//!
//! A [`ServiceError`] is never returned from a compile call: per-compile
//! failures are always a `CompilationResult::Failure` value, not an `Err`.
//! `ServiceError` only ever surfaces from [`crate::ServiceConfig::validate`]
//! and [`crate::IncrementalCompilationService::new`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
