// crates/perf-results-store/src/lib.rs
// ============================================================================
// Module: Perf Results Store Library
// Description: Filesystem-backed recorder for perf run artifacts.
// Purpose: Write artifacts, maintain the results index, and flush it once.
// Dependencies: perf-results-core, serde_json, tempfile, thiserror
// ============================================================================

//! ## Overview
//! The store crate writes perf artifacts under a results root and keeps two
//! process-lifetime indices: the [`ArtifactRegistry`] behind `Results.json`
//! and the [`NamespaceAggregator`] behind each namespace's `_all.json`. A
//! [`ResultsSession`] owns both and flushes them exactly once when the run
//! finishes.
//!
//! Recording never fails the run that produces the artifacts: every public
//! entry point reports failures through a [`ResultsEventSink`] and returns
//! normally.
//!
//! [`ResultsEventSink`]: perf_results_core::ResultsEventSink

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod aggregator;
pub mod error;
pub mod events;
mod output;
pub mod registry;
pub mod session;
pub mod writer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregator::AGGREGATE_COMPONENT;
pub use aggregator::AGGREGATE_FILE_NAME;
pub use aggregator::NamespaceAggregator;
pub use aggregator::split_logical_name;
pub use error::RecordError;
pub use events::FileEventSink;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use registry::ArtifactRegistry;
pub use registry::RESULTS_INDEX_FILE_NAME;
pub use session::FlushSummary;
pub use session::ResultsSession;
pub use writer::ArtifactPayload;
pub use writer::ArtifactWriter;
