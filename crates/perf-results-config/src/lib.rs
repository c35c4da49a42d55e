// crates/perf-results-config/src/lib.rs
// ============================================================================
// Module: Perf Results Config Library
// Description: Config model, validation, and recorder startup.
// Purpose: Single source of truth for perf-results.toml semantics.
// Dependencies: perf-results-core, perf-results-store, serde, toml
// ============================================================================

//! ## Overview
//! `perf-results-config` loads the optional `perf-results.toml` file, resolves
//! the results root, and builds the event sink and [`ResultsSession`] a perf
//! run writes through.
//!
//! [`ResultsSession`]: perf_results_store::ResultsSession

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
