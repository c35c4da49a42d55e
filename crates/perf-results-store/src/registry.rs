// crates/perf-results-store/src/registry.rs
// ============================================================================
// Module: Perf Results Artifact Registry
// Description: Shared, thread-safe results index with a one-shot flush.
// Purpose: Track every artifact written under the results root.
// Dependencies: perf-results-core, std::sync
// ============================================================================

//! ## Overview
//! [`ArtifactRegistry`] owns the [`PathIndex`] behind `Results.json`. Writers
//! on any thread record paths under the results root; the index is written
//! once at the end of the run together with the build metadata block.
//!
//! Recording never fails outward. Paths that cannot be indexed are dropped
//! and reported through the event sink.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use perf_results_core::BuildMetadata;
use perf_results_core::PathIndex;
use perf_results_core::ResultValue;
use perf_results_core::ResultsEvent;
use perf_results_core::ResultsEventSink;

use crate::error::RecordError;
use crate::output::write_json_atomic;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// File name of the results index under the results root.
pub const RESULTS_INDEX_FILE_NAME: &str = "Results.json";

/// Event label for index entries.
const INDEX_WHAT: &str = "results index";

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Process-wide index of recorded artifact files.
///
/// # Invariants
/// - The index is written at most once per registry.
/// - Concurrent `record` and `remove` calls are serialized by one lock.
pub struct ArtifactRegistry {
    /// Results root; recorded paths are stored relative to it.
    root: PathBuf,
    /// Directory tree of recorded file names.
    index: Mutex<PathIndex>,
    /// Number of `record` calls, including dropped ones.
    files_added: AtomicUsize,
    /// Set once the index has been flushed.
    flushed: AtomicBool,
    /// Build metadata written next to the index.
    build: BuildMetadata,
    /// Event sink for bookkeeping failures and flush results.
    events: Arc<dyn ResultsEventSink>,
}

impl ArtifactRegistry {
    /// Creates an empty registry rooted at `root`.
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        build: BuildMetadata,
        events: Arc<dyn ResultsEventSink>,
    ) -> Self {
        Self {
            root: root.into(),
            index: Mutex::new(PathIndex::new()),
            files_added: AtomicUsize::new(0),
            flushed: AtomicBool::new(false),
            build,
            events,
        }
    }

    /// Returns the results root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the build metadata captured for this run.
    #[must_use]
    pub const fn build(&self) -> &BuildMetadata {
        &self.build
    }

    /// Returns the path the index is flushed to.
    #[must_use]
    pub fn index_file_path(&self) -> PathBuf {
        self.root.join(RESULTS_INDEX_FILE_NAME)
    }

    /// Returns how many times `record` has been called.
    #[must_use]
    pub fn files_added(&self) -> usize {
        self.files_added.load(Ordering::SeqCst)
    }

    /// Returns true once the index has been flushed.
    #[must_use]
    pub fn is_flushed(&self) -> bool {
        self.flushed.load(Ordering::SeqCst)
    }

    /// Records a written file so it appears in the results index.
    ///
    /// Paths outside the results root, or that do not name a file, are
    /// dropped and reported as `index_record_failed`.
    pub fn record(&self, path: &Path) {
        self.files_added.fetch_add(1, Ordering::SeqCst);
        if let Err(err) = self.try_record(path) {
            self.events.emit(
                &ResultsEvent::warn("index_record_failed", INDEX_WHAT)
                    .with_path(path)
                    .with_message(&err),
            );
        }
    }

    /// Removes a file from the results index.
    ///
    /// Returns true when an entry was removed. The file on disk is left in
    /// place.
    pub fn remove(&self, path: &Path) -> bool {
        match self.try_remove(path) {
            Ok(removed) => removed,
            Err(err) => {
                self.events.emit(
                    &ResultsEvent::warn("index_remove_failed", INDEX_WHAT)
                        .with_path(path)
                        .with_message(&err),
                );
                false
            }
        }
    }

    /// Returns the sorted file list for a directory relative to the root.
    #[must_use]
    pub fn files(&self, segments: &[&str]) -> Option<Vec<String>> {
        let index = self.index.lock().ok()?;
        index.files(segments).map(<[String]>::to_vec)
    }

    /// Renders the document that [`ArtifactRegistry::flush`] writes.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Poisoned`] when the index lock is poisoned.
    pub fn snapshot(&self) -> Result<ResultValue, RecordError> {
        let results = self.index.lock().map_err(|_| RecordError::Poisoned("results index"))?.to_value();
        let mut document = BTreeMap::new();
        document.insert("results".to_string(), results);
        document.insert("build".to_string(), self.build.to_value());
        Ok(ResultValue::Map(document))
    }

    /// Writes `Results.json` once.
    ///
    /// Returns the written path, or `None` when nothing was recorded, the
    /// index was already flushed, or the write failed.
    pub fn flush(&self) -> Option<PathBuf> {
        if self.files_added() == 0 {
            return None;
        }
        if self.flushed.swap(true, Ordering::SeqCst) {
            return None;
        }
        let path = self.index_file_path();
        let outcome = self.snapshot().and_then(|document| write_json_atomic(&path, &document));
        match outcome {
            Ok(()) => {
                self.events
                    .emit(&ResultsEvent::info("results_index_written", INDEX_WHAT).with_path(&path));
                Some(path)
            }
            Err(err) => {
                self.events.emit(
                    &ResultsEvent::warn("results_index_failed", INDEX_WHAT)
                        .with_path(&path)
                        .with_message(&err),
                );
                None
            }
        }
    }

    /// Records a path, surfacing bookkeeping failures.
    fn try_record(&self, path: &Path) -> Result<(), RecordError> {
        let (segments, file_name) = split_relative(&self.root, path)?;
        let mut index = self.index.lock().map_err(|_| RecordError::Poisoned("results index"))?;
        index.record(&segments, &file_name)?;
        Ok(())
    }

    /// Removes a path, surfacing bookkeeping failures.
    fn try_remove(&self, path: &Path) -> Result<bool, RecordError> {
        let (segments, file_name) = split_relative(&self.root, path)?;
        let mut index = self.index.lock().map_err(|_| RecordError::Poisoned("results index"))?;
        Ok(index.remove(&segments, &file_name))
    }
}

// ============================================================================
// SECTION: Path Splitting
// ============================================================================

/// Splits `path` into directory segments and a file name relative to `root`.
fn split_relative(root: &Path, path: &Path) -> Result<(Vec<String>, String), RecordError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| RecordError::OutsideRoot(path.display().to_string()))?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(value) => {
                let segment = value.to_str().ok_or_else(|| {
                    RecordError::InvalidPath(format!("non utf-8 component in {}", path.display()))
                })?;
                segments.push(segment.to_string());
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(RecordError::InvalidPath(path.display().to_string()));
            }
        }
    }
    let file_name = segments
        .pop()
        .ok_or_else(|| RecordError::InvalidPath(format!("{} does not name a file", path.display())))?;
    Ok((segments, file_name))
}
