// crates/perf-results-core/tests/stream_writer.rs
// ============================================================================
// Module: Streaming Encoder Tests
// Description: Layout checks for array, heap snapshot, and timeline encoders.
// Purpose: Pin the line-grouping format consumed by profiling viewers.
// Dependencies: perf-results-core, serde_json
// ============================================================================
//! ## Overview
//! The heap snapshot and timeline layouts are external contracts, so these
//! tests compare exact bytes where the layout matters and parse the output
//! back where only content matters.

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

use std::io;
use std::io::Write;

use perf_results_core::HeapSnapshot;
use perf_results_core::ResultValue;
use perf_results_core::StreamError;
use perf_results_core::TreeStreamWriter;
use perf_results_core::write_timeline;
use serde_json::Value;
use serde_json::json;

// ========================================================================
// SECTION: Helpers
// ========================================================================

fn strings(items: &[&str]) -> Vec<ResultValue> {
    items.iter().map(|item| ResultValue::from(*item)).collect()
}

fn numbers(items: &[i64]) -> Vec<ResultValue> {
    items.iter().map(|item| ResultValue::from(*item)).collect()
}

fn render_array(key: &str, items: &[ResultValue], per_line: usize, last: bool) -> String {
    let mut writer = TreeStreamWriter::new(Vec::new());
    writer.write_array(key, items, per_line, last).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

fn sample_heap() -> HeapSnapshot {
    HeapSnapshot {
        snapshot: ResultValue::from(json!({"meta": {"node_fields": ["type", "name"]}, "node_count": 2})),
        nodes: numbers(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]),
        edges: numbers(&[1, 2, 3, 4, 5, 6]),
        trace_function_infos: Vec::new(),
        trace_tree: vec![ResultValue::from(json!([1, 2, [3]]))],
        strings: strings(&["", "(root)", "say \"hi\"\n"]),
    }
}

/// Sink that fails once a byte allowance is spent.
struct FailingSink {
    remaining: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::other("disk full"));
        }
        let written = buf.len().min(self.remaining);
        self.remaining -= written;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ========================================================================
// SECTION: Array Layout
// ========================================================================

/// Verifies seven items at five per line break once after the fifth item.
#[test]
fn array_groups_items_per_line() {
    let items = strings(&["a", "b", "c", "d", "e", "f", "g"]);
    let rendered = render_array("strings", &items, 5, false);
    assert_eq!(rendered, "\"strings\":[\"a\",\"b\",\"c\",\"d\",\"e\"\n,\"f\",\"g\"\n],\n");
    let body = &rendered[.. rendered.rfind(']').unwrap()];
    assert_eq!(body.trim_end().matches('\n').count(), 1);
    assert!(rendered.ends_with("],\n"));
}

/// Verifies one item per line puts the separator before each line break.
#[test]
fn array_one_per_line() {
    let rendered = render_array("trace_tree", &numbers(&[1, 2, 3]), 1, true);
    assert_eq!(rendered, "\"trace_tree\":[1,\n2,\n3]");
}

/// Verifies a zero items-per-line setting behaves like one per line.
#[test]
fn array_zero_per_line_is_one() {
    assert_eq!(render_array("x", &numbers(&[1, 2]), 0, true), render_array("x", &numbers(&[1, 2]), 1, true));
}

/// Verifies empty arrays keep the grouping line break for multi-item lines.
#[test]
fn array_empty_layouts() {
    assert_eq!(render_array("nodes", &[], 5, false), "\"nodes\":[\n],\n");
    assert_eq!(render_array("strings", &[], 1, true), "\"strings\":[]");
}

/// Verifies nested items are emitted in compact form and strings are escaped.
#[test]
fn array_renders_nested_and_escaped_items() {
    let items = vec![ResultValue::from(json!({"b": [1, 2], "a": null})), ResultValue::from("tab\there")];
    let rendered = render_array("mixed", &items, 1, true);
    assert_eq!(rendered, "\"mixed\":[{\"a\":null,\"b\":[1,2]},\n\"tab\\there\"]");
}

// ========================================================================
// SECTION: Heap Snapshot
// ========================================================================

/// Verifies the exact heap snapshot layout for a small payload.
#[test]
fn heap_snapshot_exact_layout() {
    let heap = HeapSnapshot {
        snapshot: ResultValue::from(json!({"node_count": 1})),
        nodes: numbers(&[1, 2, 3, 4, 5, 6]),
        edges: numbers(&[7, 8, 9]),
        trace_function_infos: Vec::new(),
        trace_tree: Vec::new(),
        strings: strings(&["a"]),
    };
    let mut writer = TreeStreamWriter::new(Vec::new());
    writer.write_heap_snapshot(&heap).unwrap();
    let rendered = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(
        rendered,
        "{\"snapshot\":{\"node_count\":1},\n\"nodes\":[1,2,3,4,5\n,6\n],\n\"edges\":[7,8,9\n],\n\
         \"trace_function_infos\":[],\n\"trace_tree\":[],\n\"strings\":[\"a\"]}"
    );
}

/// Verifies a written heap snapshot parses back with keys in contract order.
#[test]
fn heap_snapshot_round_trips_through_parser() {
    let heap = sample_heap();
    let mut writer = TreeStreamWriter::new(Vec::new());
    writer.write_heap_snapshot(&heap).unwrap();
    let bytes = writer.into_inner();
    let text = std::str::from_utf8(&bytes).unwrap();

    let keys = ["snapshot", "nodes", "edges", "trace_function_infos", "trace_tree", "strings"];
    let positions: Vec<usize> =
        keys.iter().map(|key| text.find(&format!("\"{key}\":")).unwrap()).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]), "keys out of order: {text}");

    let parsed: Value = serde_json::from_slice(&bytes).unwrap();
    let object = parsed.as_object().unwrap();
    assert_eq!(object.len(), keys.len());
    assert_eq!(ResultValue::from(object["snapshot"].clone()), heap.snapshot);
    for key in &keys[1 ..] {
        let items: Vec<ResultValue> =
            object[*key].as_array().unwrap().iter().cloned().map(ResultValue::from).collect();
        assert_eq!(items.as_slice(), heap.array(key).unwrap(), "mismatch for {key}");
    }
}

/// Verifies heap snapshots are extracted from generic payload maps.
#[test]
fn heap_snapshot_from_value_extracts_sections() {
    let value = ResultValue::from(json!({
        "snapshot": {"node_count": 0},
        "nodes": [1, 2],
        "edges": [],
        "trace_function_infos": [],
        "trace_tree": [],
        "strings": ["x"],
        "extra": "ignored"
    }));
    let heap = HeapSnapshot::from_value(value).unwrap();
    assert_eq!(heap.nodes, numbers(&[1, 2]));
    assert_eq!(heap.strings, strings(&["x"]));
}

/// Verifies a missing array is reported as a malformed payload.
#[test]
fn heap_snapshot_from_value_rejects_missing_list() {
    let value = ResultValue::from(json!({
        "snapshot": {},
        "nodes": [],
        "trace_function_infos": [],
        "trace_tree": [],
        "strings": []
    }));
    let err = HeapSnapshot::from_value(value).unwrap_err();
    assert!(matches!(err, StreamError::MalformedPayload { ref key } if key == "edges"), "{err}");
}

/// Verifies a non-map header is reported as a malformed payload.
#[test]
fn heap_snapshot_from_value_rejects_scalar_header() {
    let value = ResultValue::from(json!({"snapshot": 3}));
    let err = HeapSnapshot::from_value(value).unwrap_err();
    assert!(matches!(err, StreamError::MalformedPayload { ref key } if key == "snapshot"), "{err}");
}

/// Verifies sink failures abort the write with an I/O error.
#[test]
fn heap_snapshot_reports_sink_failure() {
    let mut writer = TreeStreamWriter::new(FailingSink {
        remaining: 24,
    });
    let err = writer.write_heap_snapshot(&sample_heap()).unwrap_err();
    assert!(matches!(err, StreamError::Io(_)), "unexpected error: {err}");
}

/// Verifies flush pushes buffered output through to the inner sink.
#[test]
fn flush_drains_buffered_sink() {
    let mut writer = TreeStreamWriter::new(io::BufWriter::with_capacity(64, Vec::new()));
    writer.write_key("strings").unwrap();
    writer.write_value(&ResultValue::from("a")).unwrap();
    let buffered = writer.into_inner();
    assert!(buffered.get_ref().is_empty());

    let mut writer = TreeStreamWriter::new(buffered);
    writer.flush().unwrap();
    assert_eq!(writer.into_inner().get_ref().as_slice(), b"\"strings\":\"a\"");
}

// ========================================================================
// SECTION: Timeline
// ========================================================================

/// Verifies timeline logs lead with the user agent and end with a newline.
#[test]
fn timeline_layout() {
    let entries = vec![ResultValue::from(json!({"a": 1})), ResultValue::from(json!({"b": [true]}))];
    let mut buffer = Vec::new();
    write_timeline(&mut buffer, "Agent \"1.0\"", &entries).unwrap();
    assert_eq!(
        String::from_utf8(buffer.clone()).unwrap(),
        "[\"Agent \\\"1.0\\\"\",\n{\"a\":1},\n{\"b\":[true]}]\n"
    );
    let parsed: Value = serde_json::from_slice(&buffer).unwrap();
    assert_eq!(parsed, json!(["Agent \"1.0\"", {"a": 1}, {"b": [true]}]));
}

/// Verifies a timeline without entries still forms a valid document.
#[test]
fn timeline_without_entries() {
    let mut buffer = Vec::new();
    write_timeline(&mut buffer, "ua", &[]).unwrap();
    assert_eq!(buffer, b"[\"ua\"]\n");
}
