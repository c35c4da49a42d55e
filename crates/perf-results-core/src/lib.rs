// crates/perf-results-core/src/lib.rs
// ============================================================================
// Module: Perf Results Core Library
// Description: Public API surface for the perf results core.
// Purpose: Expose payload types, the path index, and streaming encoders.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Perf results core holds the I/O-free pieces of the perf artifact recorder:
//! the opaque payload tree, artifact categories, build metadata capture, the
//! path-keyed results index, and the streaming encoders used for large
//! heap snapshots and timeline logs. Filesystem concerns live in
//! `perf-results-store`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::EnvSource;
pub use interfaces::EventLevel;
pub use interfaces::ProcessEnv;
pub use interfaces::ResultsEvent;
pub use interfaces::ResultsEventSink;
pub use runtime::HeapSnapshot;
pub use runtime::IndexError;
pub use runtime::PathIndex;
pub use runtime::StreamError;
pub use runtime::TreeStreamWriter;
pub use runtime::write_timeline;
