// crates/perf-results-store/src/aggregator.rs
// ============================================================================
// Module: Perf Results Namespace Aggregator
// Description: Per-namespace summary tables for gold file metrics.
// Purpose: Write one `_all.json` per gold file namespace at the end of a run.
// Dependencies: perf-results-core, std::sync
// ============================================================================

//! ## Overview
//! Gold file names look like `namespace/component`. Alongside each gold file
//! the caller hands over a small summary; [`NamespaceAggregator`] collects
//! those summaries by namespace and writes each table to
//! `goldfiles/<namespace>/_all.json` when the run finishes. A name without a
//! `/` belongs to the empty namespace, whose table lands in
//! `goldfiles/_all.json`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use perf_results_core::ArtifactCategory;
use perf_results_core::ResultValue;
use perf_results_core::ResultsEvent;
use perf_results_core::ResultsEventSink;

use crate::output::validate_relative;
use crate::output::write_json_atomic;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Component name reserved for the namespace summary table.
pub const AGGREGATE_COMPONENT: &str = "_all";

/// File name of each namespace summary table.
pub const AGGREGATE_FILE_NAME: &str = "_all.json";

/// Event label for aggregate entries.
const AGGREGATE_WHAT: &str = "gold file summary";

/// Summary tables keyed by namespace, then by component.
type Tables = BTreeMap<String, BTreeMap<String, ResultValue>>;

// ============================================================================
// SECTION: Name Splitting
// ============================================================================

/// Splits a logical name into `(namespace, component)` at the last `/`.
///
/// Names without a `/` have an empty namespace.
#[must_use]
pub fn split_logical_name(name: &str) -> (&str, &str) {
    name.rsplit_once('/').unwrap_or(("", name))
}

/// Joins the non-empty, non-`.` segments of a namespace with `/`.
fn canonical_namespace(namespace: &str) -> String {
    namespace
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// SECTION: Aggregator
// ============================================================================

/// Collects gold file summaries grouped by namespace.
///
/// # Invariants
/// - Within a namespace, the last summary added for a component wins.
/// - Tables are written at most once per aggregator.
pub struct NamespaceAggregator {
    /// Results root.
    root: PathBuf,
    /// Summary tables.
    tables: Mutex<Tables>,
    /// Set once the tables have been flushed.
    flushed: AtomicBool,
    /// Event sink for flush results.
    events: Arc<dyn ResultsEventSink>,
}

impl NamespaceAggregator {
    /// Creates an empty aggregator rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, events: Arc<dyn ResultsEventSink>) -> Self {
        Self {
            root: root.into(),
            tables: Mutex::new(BTreeMap::new()),
            flushed: AtomicBool::new(false),
            events,
        }
    }

    /// Returns the results root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Adds `summary` under the namespace and component of `logical_name`.
    pub fn add(&self, logical_name: &str, summary: ResultValue) {
        let (namespace, component) = split_logical_name(logical_name);
        self.add_entry(namespace, component, summary);
    }

    /// Adds `summary` to the `namespace` table under `component`.
    ///
    /// Empty and `.` segments of `namespace` are dropped, so `ui//x` and
    /// `ui/./x` share the `ui` table.
    pub fn add_entry(&self, namespace: &str, component: &str, summary: ResultValue) {
        let namespace = canonical_namespace(namespace);
        match self.tables.lock() {
            Ok(mut tables) => {
                tables
                    .entry(namespace)
                    .or_default()
                    .insert(component.to_string(), summary);
            }
            Err(_) => self.events.emit(
                &ResultsEvent::warn("aggregate_failed", AGGREGATE_WHAT).with_message(format!(
                    "summary tables mutex poisoned; dropped {namespace}/{component}"
                )),
            ),
        }
    }

    /// Returns a copy of one namespace table.
    #[must_use]
    pub fn table(&self, namespace: &str) -> Option<BTreeMap<String, ResultValue>> {
        self.tables.lock().ok()?.get(namespace).cloned()
    }

    /// Returns the namespaces that have at least one summary.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        self.tables.lock().map(|tables| tables.keys().cloned().collect()).unwrap_or_default()
    }

    /// Returns the summary table path for a namespace.
    #[must_use]
    pub fn aggregate_path(&self, namespace: &str) -> PathBuf {
        let mut path = self.root.join(ArtifactCategory::GoldFile.dir_name());
        if !namespace.is_empty() {
            path.push(namespace);
        }
        path.join(AGGREGATE_FILE_NAME)
    }

    /// Writes every namespace table once.
    ///
    /// Each namespace is written independently; failures are reported and
    /// skipped. Returns the paths that were written.
    pub fn flush(&self) -> Vec<PathBuf> {
        if self.flushed.swap(true, Ordering::SeqCst) {
            return Vec::new();
        }
        let tables = match self.tables.lock() {
            Ok(tables) => tables.clone(),
            Err(_) => {
                self.events.emit(
                    &ResultsEvent::warn("aggregate_failed", AGGREGATE_WHAT)
                        .with_message("summary tables mutex poisoned"),
                );
                return Vec::new();
            }
        };
        let mut written = Vec::with_capacity(tables.len());
        for (namespace, table) in &tables {
            let path = self.aggregate_path(namespace);
            let outcome = validate_relative(Path::new(namespace))
                .and_then(|()| write_json_atomic(&path, table));
            match outcome {
                Ok(()) => {
                    self.events.emit(
                        &ResultsEvent::info("aggregate_written", AGGREGATE_WHAT).with_path(&path),
                    );
                    written.push(path);
                }
                Err(err) => self.events.emit(
                    &ResultsEvent::warn("aggregate_failed", AGGREGATE_WHAT)
                        .with_path(&path)
                        .with_message(&err),
                ),
            }
        }
        written
    }
}
