// crates/perf-results-store/src/session.rs
// ============================================================================
// Module: Perf Results Session
// Description: Owner of the shared registry, aggregator, and writer.
// Purpose: Run the end-of-run flushes exactly once.
// Dependencies: perf-results-core
// ============================================================================

//! ## Overview
//! A [`ResultsSession`] is opened once per perf run and handed to call sites
//! by reference. It flushes the results index and the gold file summary
//! tables when [`ResultsSession::finish`] is called, or when it is dropped
//! without being finished. A process that aborts skips both flushes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use perf_results_core::BuildMetadata;
use perf_results_core::ResultsEventSink;

use crate::aggregator::NamespaceAggregator;
use crate::registry::ArtifactRegistry;
use crate::writer::ArtifactWriter;

// ============================================================================
// SECTION: Flush Summary
// ============================================================================

/// Files written by the end-of-run flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Results index path, when it was written.
    pub results_index: Option<PathBuf>,
    /// Namespace summary tables that were written.
    pub aggregates: Vec<PathBuf>,
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Per-run recorder state.
///
/// # Invariants
/// - The flushes run at most once, on `finish` or on drop.
pub struct ResultsSession {
    /// Shared results index.
    registry: Arc<ArtifactRegistry>,
    /// Shared gold file summary tables.
    aggregator: Arc<NamespaceAggregator>,
    /// Artifact writer over the shared state.
    writer: ArtifactWriter,
    /// Set once the flushes have run.
    finished: bool,
}

impl ResultsSession {
    /// Opens a session writing under `root`.
    #[must_use]
    pub fn open(
        root: impl Into<PathBuf>,
        build: BuildMetadata,
        events: Arc<dyn ResultsEventSink>,
    ) -> Self {
        let root = root.into();
        let registry = Arc::new(ArtifactRegistry::new(root.clone(), build, Arc::clone(&events)));
        let aggregator = Arc::new(NamespaceAggregator::new(root.clone(), Arc::clone(&events)));
        let writer =
            ArtifactWriter::new(root, Arc::clone(&registry), Arc::clone(&aggregator), events);
        Self {
            registry,
            aggregator,
            writer,
            finished: false,
        }
    }

    /// Returns the results root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.writer.root()
    }

    /// Returns the artifact writer.
    #[must_use]
    pub const fn writer(&self) -> &ArtifactWriter {
        &self.writer
    }

    /// Returns the shared results index.
    #[must_use]
    pub const fn registry(&self) -> &Arc<ArtifactRegistry> {
        &self.registry
    }

    /// Returns the shared gold file summary tables.
    #[must_use]
    pub const fn aggregator(&self) -> &Arc<NamespaceAggregator> {
        &self.aggregator
    }

    /// Flushes the results index, then the summary tables.
    pub fn finish(mut self) -> FlushSummary {
        self.flush_once()
    }

    /// Runs both flushes unless they already ran.
    fn flush_once(&mut self) -> FlushSummary {
        if self.finished {
            return FlushSummary::default();
        }
        self.finished = true;
        FlushSummary {
            results_index: self.registry.flush(),
            aggregates: self.aggregator.flush(),
        }
    }
}

impl Drop for ResultsSession {
    fn drop(&mut self) {
        self.flush_once();
    }
}
