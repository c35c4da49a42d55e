// crates/perf-results-core/src/runtime/mod.rs
// ============================================================================
// Module: Perf Results Runtime
// Description: Results index and streaming encoders.
// Purpose: Hold the stateful and I/O-shaped logic that store backends drive.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Runtime components are the parts of the recorder with real behavior: the
//! path-keyed [`PathIndex`] behind `Results.json`, and the
//! [`TreeStreamWriter`] that emits large arrays line by line.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod path_index;
pub mod stream;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use path_index::IndexError;
pub use path_index::LIST_KEY;
pub use path_index::PathIndex;
pub use stream::HEAP_SNAPSHOT_ARRAYS;
pub use stream::HeapSnapshot;
pub use stream::SNAPSHOT_KEY;
pub use stream::StreamError;
pub use stream::TreeStreamWriter;
pub use stream::write_timeline;
