// crates/perf-results-core/tests/path_index.rs
// ============================================================================
// Module: Path Index Tests
// Description: Ordering, idempotence, and removal checks for the path index.
// Purpose: Validate the bookkeeping rules behind Results.json.
// Dependencies: perf-results-core, serde_json
// ============================================================================
//! ## Overview
//! Exercises ordered insertion, duplicate handling, removal, segment
//! validation, and the rendered results tree.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use perf_results_core::IndexError;
use perf_results_core::PathIndex;
use serde_json::json;

// ========================================================================
// SECTION: Ordering
// ========================================================================

/// Verifies files land in ascending order regardless of insertion order.
#[test]
fn record_keeps_directory_sorted() {
    let mut index = PathIndex::new();
    for name in ["c.json", "a.json", "d.json", "b.json"] {
        index.record(&["timelines", "ui"], name).unwrap();
    }
    assert_eq!(index.files(&["timelines", "ui"]).unwrap(), ["a.json", "b.json", "c.json", "d.json"]);
}

/// Verifies ordering is ordinal, so uppercase sorts before lowercase.
#[test]
fn record_uses_ordinal_comparison() {
    let mut index = PathIndex::new();
    for name in ["b.json", "B.json", "a.json", "_all.json"] {
        index.record(&["goldfiles"], name).unwrap();
    }
    assert_eq!(index.files(&["goldfiles"]).unwrap(), ["B.json", "_all.json", "a.json", "b.json"]);
}

/// Verifies recording the same name twice keeps a single entry.
#[test]
fn record_is_idempotent() {
    let mut index = PathIndex::new();
    index.record(&["stats"], "run.json").unwrap();
    index.record(&["stats"], "other.json").unwrap();
    index.record(&["stats"], "run.json").unwrap();
    assert_eq!(index.files(&["stats"]).unwrap(), ["other.json", "run.json"]);
    assert_eq!(index.file_count(), 2);
}

// ========================================================================
// SECTION: Removal
// ========================================================================

/// Verifies removal deletes the recorded name and keeps the rest sorted.
#[test]
fn remove_after_record_drops_entry() {
    let mut index = PathIndex::new();
    index.record(&["heaps"], "a.heapsnapshot").unwrap();
    index.record(&["heaps"], "b.heapsnapshot").unwrap();
    assert!(index.remove(&["heaps"], "a.heapsnapshot"));
    assert_eq!(index.files(&["heaps"]).unwrap(), ["b.heapsnapshot"]);
}

/// Verifies removing unknown names or directories is a no-op.
#[test]
fn remove_unknown_is_noop() {
    let mut index = PathIndex::new();
    index.record(&["heaps"], "a.heapsnapshot").unwrap();
    let before = index.clone();
    assert!(!index.remove(&["heaps"], "missing.heapsnapshot"));
    assert!(!index.remove(&["profiles"], "a.heapsnapshot"));
    assert!(!index.remove(&["heaps", "deeper"], "a.heapsnapshot"));
    assert_eq!(index, before);
}

/// Verifies removing the last file keeps an empty list for the directory.
#[test]
fn remove_last_file_keeps_empty_list() {
    let mut index = PathIndex::new();
    index.record(&["stats"], "run.json").unwrap();
    assert!(index.remove(&["stats"], "run.json"));
    assert_eq!(index.files(&["stats"]).unwrap(), [] as [String; 0]);
    assert_eq!(serde_json::to_value(index.to_value()).unwrap(), json!({"stats": {"list": []}}));
}

// ========================================================================
// SECTION: Validation
// ========================================================================

/// Verifies empty segments are rejected without touching the index.
#[test]
fn record_rejects_empty_segment() {
    let mut index = PathIndex::new();
    let err = index.record(&["goldfiles", ""], "a.json").unwrap_err();
    assert_eq!(err, IndexError::EmptySegment);
    assert!(index.is_empty());
}

/// Verifies the list key cannot be used as a directory name.
#[test]
fn record_rejects_reserved_segment() {
    let mut index = PathIndex::new();
    let err = index.record(&["goldfiles", "list"], "a.json").unwrap_err();
    assert_eq!(err, IndexError::ReservedSegment("list".to_string()));
    assert!(index.is_empty());
}

/// Verifies empty file names are rejected.
#[test]
fn record_rejects_empty_file_name() {
    let mut index = PathIndex::new();
    assert_eq!(index.record(&["stats"], "").unwrap_err(), IndexError::EmptyFileName);
    assert!(index.is_empty());
}

// ========================================================================
// SECTION: Rendering
// ========================================================================

/// Verifies the rendered tree mirrors the directory hierarchy.
#[test]
fn to_value_mirrors_directories() {
    let mut index = PathIndex::new();
    index.record(&["timelines", "ui"], "b.json").unwrap();
    index.record(&["timelines", "ui"], "a.json").unwrap();
    index.record(&["goldfiles", "ui"], "button.json").unwrap();
    index.record(&["stats"], "run.json").unwrap();
    index.record(&["timelines"], "top.json").unwrap();

    let rendered = serde_json::to_value(index.to_value()).unwrap();
    assert_eq!(
        rendered,
        json!({
            "goldfiles": {"ui": {"list": ["button.json"]}},
            "stats": {"list": ["run.json"]},
            "timelines": {"list": ["top.json"], "ui": {"list": ["a.json", "b.json"]}},
        })
    );
}

/// Verifies an empty index renders as an empty map.
#[test]
fn empty_index_renders_empty_map() {
    let index = PathIndex::new();
    assert!(index.is_empty());
    assert_eq!(serde_json::to_value(index.to_value()).unwrap(), json!({}));
}
