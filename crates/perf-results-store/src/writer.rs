// crates/perf-results-store/src/writer.rs
// ============================================================================
// Module: Perf Results Artifact Writer
// Description: Category-aware artifact writes under the results root.
// Purpose: Write artifacts, index them, and feed gold file summaries.
// Dependencies: perf-results-core, serde_json
// ============================================================================

//! ## Overview
//! [`ArtifactWriter`] is the entry point perf tests call. Each write resolves
//! `<root>/<category dir>/<name><extension>`, streams the payload to disk, and
//! records the file in the shared [`ArtifactRegistry`] once the write has
//! succeeded. Failures never reach the caller: they are reported through the
//! event sink and the intended path is returned regardless.
//!
//! Security posture: artifact names are untrusted input. Absolute names and
//! `..` components are rejected before any filesystem access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use perf_results_core::ArtifactCategory;
use perf_results_core::HeapSnapshot;
use perf_results_core::ResultValue;
use perf_results_core::ResultsEvent;
use perf_results_core::ResultsEventSink;
use perf_results_core::StreamError;
use perf_results_core::TreeStreamWriter;
use perf_results_core::write_timeline;

use crate::aggregator::AGGREGATE_COMPONENT;
use crate::aggregator::NamespaceAggregator;
use crate::aggregator::split_logical_name;
use crate::error::RecordError;
use crate::output::validate_artifact_name;
use crate::output::write_streamed;
use crate::registry::ArtifactRegistry;

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Artifact content handed to [`ArtifactWriter::write`].
#[derive(Debug, Clone, Copy)]
pub enum ArtifactPayload<'a> {
    /// Pre-rendered text written verbatim.
    Text(&'a str),
    /// Value tree written as compact JSON.
    Tree(&'a ResultValue),
    /// Heap snapshot written in the line-grouped snapshot layout.
    HeapSnapshot(&'a HeapSnapshot),
    /// Timeline log: user agent header followed by one entry per line.
    Timeline {
        /// User agent of the browser that produced the timeline.
        user_agent: &'a str,
        /// Timeline entries.
        entries: &'a [ResultValue],
    },
}

impl ArtifactPayload<'_> {
    /// Encodes the payload into `sink`.
    fn encode<W: Write>(&self, sink: &mut W) -> Result<(), StreamError> {
        match self {
            Self::Text(text) => sink.write_all(text.as_bytes())?,
            Self::Tree(value) => serde_json::to_writer(&mut *sink, value)?,
            Self::HeapSnapshot(heap) => TreeStreamWriter::new(&mut *sink).write_heap_snapshot(heap)?,
            Self::Timeline {
                user_agent,
                entries,
            } => write_timeline(sink, user_agent, entries)?,
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Writer
// ============================================================================

/// Writes perf artifacts and keeps the results index current.
///
/// # Invariants
/// - A file is recorded only after its write completed.
/// - Every write returns the intended destination path.
#[derive(Clone)]
pub struct ArtifactWriter {
    /// Results root.
    root: PathBuf,
    /// Shared results index.
    registry: Arc<ArtifactRegistry>,
    /// Shared gold file summary tables.
    aggregator: Arc<NamespaceAggregator>,
    /// Event sink.
    events: Arc<dyn ResultsEventSink>,
}

impl ArtifactWriter {
    /// Creates a writer over a shared registry and aggregator.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        registry: Arc<ArtifactRegistry>,
        aggregator: Arc<NamespaceAggregator>,
        events: Arc<dyn ResultsEventSink>,
    ) -> Self {
        Self {
            root: root.into(),
            registry,
            aggregator,
            events,
        }
    }

    /// Returns the results root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the destination path for an artifact.
    #[must_use]
    pub fn destination(&self, category: ArtifactCategory, name: &str) -> PathBuf {
        self.root.join(category.relative_path(name))
    }

    /// Writes an artifact and records it in the results index.
    ///
    /// Returns the destination path whether or not the write succeeded.
    pub fn write(
        &self,
        category: ArtifactCategory,
        name: &str,
        payload: &ArtifactPayload<'_>,
    ) -> PathBuf {
        let path = self.destination(category, name);
        if let Err(err) = check_name(category, name) {
            self.reject(category, &path, &err);
            return path;
        }
        match write_streamed(&path, |sink| payload.encode(sink)) {
            Ok(()) => {
                self.registry.record(&path);
                self.events.emit(
                    &ResultsEvent::info("artifact_written", category.label()).with_path(&path),
                );
            }
            Err(err) => self.events.emit(
                &ResultsEvent::warn("artifact_write_failed", category.label())
                    .with_path(&path)
                    .with_message(&err),
            ),
        }
        path
    }

    /// Writes serialized framework stats.
    pub fn write_stats(&self, name: &str, text: &str) -> PathBuf {
        self.write(ArtifactCategory::Stats, name, &ArtifactPayload::Text(text))
    }

    /// Writes a metrics gold file and adds its summary to the namespace table.
    pub fn write_gold_file(&self, name: &str, text: &str, summary: ResultValue) -> PathBuf {
        if check_name(ArtifactCategory::GoldFile, name).is_ok() {
            self.aggregator.add(name, summary);
        }
        self.write(ArtifactCategory::GoldFile, name, &ArtifactPayload::Text(text))
    }

    /// Writes a heap snapshot from a generic map payload.
    ///
    /// Payloads missing one of the snapshot keys are rejected without
    /// touching the filesystem.
    pub fn write_heap_snapshot(&self, name: &str, payload: ResultValue) -> PathBuf {
        match HeapSnapshot::from_value(payload) {
            Ok(heap) => {
                self.write(ArtifactCategory::HeapSnapshot, name, &ArtifactPayload::HeapSnapshot(&heap))
            }
            Err(err) => {
                let path = self.destination(ArtifactCategory::HeapSnapshot, name);
                self.reject(ArtifactCategory::HeapSnapshot, &path, &RecordError::from(err));
                path
            }
        }
    }

    /// Writes a CPU profile as compact JSON.
    pub fn write_cpu_profile(&self, name: &str, profile: &ResultValue) -> PathBuf {
        self.write(ArtifactCategory::CpuProfile, name, &ArtifactPayload::Tree(profile))
    }

    /// Writes a timeline log.
    pub fn write_timeline(&self, name: &str, user_agent: &str, entries: &[ResultValue]) -> PathBuf {
        self.write(
            ArtifactCategory::Timeline,
            name,
            &ArtifactPayload::Timeline {
                user_agent,
                entries,
            },
        )
    }

    /// Removes an artifact from the results index.
    ///
    /// The file on disk is left untouched. Returns true when an entry was
    /// removed.
    pub fn remove(&self, category: ArtifactCategory, name: &str) -> bool {
        if check_name(category, name).is_err() {
            return false;
        }
        self.registry.remove(&self.destination(category, name))
    }

    /// Reports an artifact that was not written.
    fn reject(&self, category: ArtifactCategory, path: &Path, err: &RecordError) {
        self.events.emit(
            &ResultsEvent::warn("artifact_rejected", category.label())
                .with_path(path)
                .with_message(err),
        );
    }
}

// ============================================================================
// SECTION: Name Checks
// ============================================================================

/// Validates an artifact name for a category.
///
/// Gold files may not use the component reserved for namespace summary
/// tables, which are written to the same directory at flush time.
fn check_name(category: ArtifactCategory, name: &str) -> Result<(), RecordError> {
    validate_artifact_name(name)?;
    if category == ArtifactCategory::GoldFile && split_logical_name(name).1 == AGGREGATE_COMPONENT
    {
        return Err(RecordError::InvalidName(format!(
            "{AGGREGATE_COMPONENT} is reserved for namespace summaries"
        )));
    }
    Ok(())
}
