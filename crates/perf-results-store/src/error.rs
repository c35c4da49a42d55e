// crates/perf-results-store/src/error.rs
// ============================================================================
// Module: Perf Results Store Errors
// Description: Error taxonomy for artifact writes and index bookkeeping.
// Purpose: Classify failures before they are logged and swallowed.
// Dependencies: perf-results-core, thiserror
// ============================================================================

//! ## Overview
//! [`RecordError`] is internal currency: recorder entry points convert it into
//! a warning event rather than returning it.

use perf_results_core::IndexError;
use perf_results_core::StreamError;
use thiserror::Error;

/// Artifact recording errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Filesystem failure.
    #[error("results io error: {0}")]
    Io(String),
    /// Artifact name cannot be mapped to a path under the results root.
    #[error("invalid artifact name: {0}")]
    InvalidName(String),
    /// Recorded path does not lie under the results root.
    #[error("path is outside the results root: {0}")]
    OutsideRoot(String),
    /// Recorded path has an unexpected shape.
    #[error("unexpected results path: {0}")]
    InvalidPath(String),
    /// Index bookkeeping rejected the path.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// Payload could not be encoded.
    #[error(transparent)]
    Stream(#[from] StreamError),
    /// A shared index lock was poisoned by a panicking writer.
    #[error("{0} mutex poisoned")]
    Poisoned(&'static str),
}

impl From<std::io::Error> for RecordError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
