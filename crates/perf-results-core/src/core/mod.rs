// crates/perf-results-core/src/core/mod.rs
// ============================================================================
// Module: Perf Results Core Types
// Description: Payload, category, and build metadata types.
// Purpose: Provide stable, serializable types shared by every recorder surface.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe what gets recorded: the opaque [`ResultValue`] tree
//! handed over by callers, the fixed [`ArtifactCategory`] layout, and the
//! [`BuildMetadata`] block embedded in the results index.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod build;
pub mod category;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use build::BUILD_KEYS;
pub use build::BuildKey;
pub use build::BuildMetadata;
pub use category::ArtifactCategory;
pub use category::CategoryError;
pub use value::ResultValue;
