// crates/perf-results-store/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared scratch roots and event capture for store tests.
// Purpose: Provide reusable test infrastructure for deterministic testing.
// Dependencies: perf-results-core, perf-results-store, tempfile
// ============================================================================

//! ## Overview
//! Every test gets its own temporary results root and a memory event sink so
//! failures reported by the recorder can be asserted on.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use perf_results_core::BuildMetadata;
use perf_results_core::ResultsEventSink;
use perf_results_store::ArtifactRegistry;
use perf_results_store::MemoryEventSink;
use perf_results_store::NamespaceAggregator;
use perf_results_store::ResultsSession;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Temporary results root with captured events.
pub struct TestRoot {
    /// Scratch directory removed on drop.
    dir: TempDir,
    /// Captured recorder events.
    pub events: Arc<MemoryEventSink>,
}

impl TestRoot {
    /// Creates a fresh scratch root.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            events: Arc::new(MemoryEventSink::new()),
        }
    }

    /// Returns the results root.
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Returns the event sink as a trait object.
    pub fn sink(&self) -> Arc<dyn ResultsEventSink> {
        self.events.clone()
    }

    /// Opens a session over the scratch root.
    pub fn session(&self) -> ResultsSession {
        ResultsSession::open(self.root(), sample_build(), self.sink())
    }

    /// Creates a standalone registry over the scratch root.
    pub fn registry(&self) -> ArtifactRegistry {
        ArtifactRegistry::new(self.root(), sample_build(), self.sink())
    }

    /// Creates a standalone aggregator over the scratch root.
    pub fn aggregator(&self) -> NamespaceAggregator {
        NamespaceAggregator::new(self.root(), self.sink())
    }

    /// Returns true when an event with `label` was emitted.
    pub fn saw(&self, label: &str) -> bool {
        self.events.labels().contains(&label)
    }
}

/// Build metadata with a fixed build number and commit.
pub fn sample_build() -> BuildMetadata {
    let env: BTreeMap<String, String> = BTreeMap::from([
        ("BUILD_NUMBER".to_string(), "42".to_string()),
        ("GIT_COMMIT".to_string(), "abc123".to_string()),
    ]);
    BuildMetadata::capture(&env)
}

/// Parses a JSON file.
pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}
