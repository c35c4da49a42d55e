// crates/perf-results-core/src/runtime/stream.rs
// ============================================================================
// Module: Perf Results Streaming Encoders
// Description: Incremental structured-text writers for large artifacts.
// Purpose: Emit heap snapshots and timeline logs without rendering them whole.
// Dependencies: crate::core::value, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Heap snapshots can hold millions of array items. [`TreeStreamWriter`]
//! writes each item straight into the output sink, grouping a configurable
//! number of items per line. The heap snapshot layout (key names, key order,
//! and items per line) matches the format saved by browser developer tools,
//! so memory-profiling viewers can load the files directly.
//!
//! I/O failures abort the write. The sink may then hold a partial document;
//! callers are expected to discard it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io;
use std::io::Write;

use thiserror::Error;

use crate::core::ResultValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the scalar header object in a heap snapshot.
pub const SNAPSHOT_KEY: &str = "snapshot";

/// Heap snapshot arrays in output order with their items per line.
pub const HEAP_SNAPSHOT_ARRAYS: [(&str, usize); 5] = [
    ("nodes", 5),
    ("edges", 3),
    ("trace_function_infos", 1),
    ("trace_tree", 1),
    ("strings", 1),
];

/// Line separator used by all encoders.
const NEWLINE: &[u8] = b"\n";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Streaming encoder errors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The output sink failed.
    #[error("stream io error: {0}")]
    Io(#[from] io::Error),
    /// The payload is missing an expected entry or has the wrong shape.
    #[error("malformed payload: missing or invalid `{key}`")]
    MalformedPayload {
        /// Key that failed validation.
        key: String,
    },
    /// A value could not be encoded.
    #[error("stream encode error: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() { Self::Io(err.into()) } else { Self::Encode(err.to_string()) }
    }
}

// ============================================================================
// SECTION: Heap Snapshot Payload
// ============================================================================

/// Graph-shaped heap snapshot payload.
///
/// # Invariants
/// - `snapshot` is rendered verbatim; array items are pre-rendered scalars or
///   nested values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeapSnapshot {
    /// Scalar header object.
    pub snapshot: ResultValue,
    /// Flattened node records.
    pub nodes: Vec<ResultValue>,
    /// Flattened edge records.
    pub edges: Vec<ResultValue>,
    /// Allocation trace function infos.
    pub trace_function_infos: Vec<ResultValue>,
    /// Allocation trace tree.
    pub trace_tree: Vec<ResultValue>,
    /// String table.
    pub strings: Vec<ResultValue>,
}

impl HeapSnapshot {
    /// Extracts a heap snapshot from a generic map payload.
    ///
    /// The payload is consumed so large arrays move instead of being copied.
    /// Keys other than the six heap snapshot keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::MalformedPayload`] when the payload is not a map,
    /// `snapshot` is not a map, or one of the arrays is absent or not a list.
    pub fn from_value(value: ResultValue) -> Result<Self, StreamError> {
        let ResultValue::Map(mut entries) = value else {
            return Err(malformed(SNAPSHOT_KEY));
        };
        let snapshot = entries
            .remove(SNAPSHOT_KEY)
            .filter(|header| header.as_map().is_some())
            .ok_or_else(|| malformed(SNAPSHOT_KEY))?;
        Ok(Self {
            snapshot,
            nodes: take_list(&mut entries, "nodes")?,
            edges: take_list(&mut entries, "edges")?,
            trace_function_infos: take_list(&mut entries, "trace_function_infos")?,
            trace_tree: take_list(&mut entries, "trace_tree")?,
            strings: take_list(&mut entries, "strings")?,
        })
    }

    /// Returns the array stored under a heap snapshot key.
    #[must_use]
    pub fn array(&self, key: &str) -> Option<&[ResultValue]> {
        match key {
            "nodes" => Some(&self.nodes),
            "edges" => Some(&self.edges),
            "trace_function_infos" => Some(&self.trace_function_infos),
            "trace_tree" => Some(&self.trace_tree),
            "strings" => Some(&self.strings),
            _ => None,
        }
    }
}

/// Moves the list stored under `key` out of the payload map.
fn take_list(
    entries: &mut BTreeMap<String, ResultValue>,
    key: &str,
) -> Result<Vec<ResultValue>, StreamError> {
    match entries.remove(key) {
        Some(ResultValue::List(items)) => Ok(items),
        _ => Err(malformed(key)),
    }
}

/// Builds a malformed payload error.
fn malformed(key: &str) -> StreamError {
    StreamError::MalformedPayload {
        key: key.to_string(),
    }
}

// ============================================================================
// SECTION: Tree Writer
// ============================================================================

/// Incremental writer for structured-text documents.
pub struct TreeStreamWriter<W: Write> {
    /// Output sink.
    sink: W,
}

impl<W: Write> TreeStreamWriter<W> {
    /// Wraps an output sink.
    pub const fn new(sink: W) -> Self {
        Self {
            sink,
        }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }

    /// Writes a quoted key followed by `:`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the sink fails.
    pub fn write_key(&mut self, key: &str) -> Result<(), StreamError> {
        serde_json::to_writer(&mut self.sink, key)?;
        self.sink.write_all(b":")?;
        Ok(())
    }

    /// Writes a single value in compact form; strings are quoted and escaped.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the sink fails.
    pub fn write_value(&mut self, value: &ResultValue) -> Result<(), StreamError> {
        serde_json::to_writer(&mut self.sink, value)?;
        Ok(())
    }

    /// Writes `"key":[...]` grouping `items_per_line` items per line.
    ///
    /// With more than one item per line, a line break precedes the comma of
    /// every item that starts a new group and another precedes the closing
    /// bracket. With one item per line, every comma is followed by a line
    /// break. Unless `last` is set, `,` and a line break follow the bracket.
    /// An `items_per_line` of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the sink fails.
    pub fn write_array(
        &mut self,
        key: &str,
        items: &[ResultValue],
        items_per_line: usize,
        last: bool,
    ) -> Result<(), StreamError> {
        let per_line = items_per_line.max(1);
        self.write_key(key)?;
        self.sink.write_all(b"[")?;
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                if per_line > 1 {
                    if index % per_line == 0 {
                        self.sink.write_all(NEWLINE)?;
                    }
                    self.sink.write_all(b",")?;
                } else {
                    self.sink.write_all(b",")?;
                    self.sink.write_all(NEWLINE)?;
                }
            }
            self.write_value(item)?;
        }
        if per_line > 1 {
            self.sink.write_all(NEWLINE)?;
        }
        self.sink.write_all(b"]")?;
        if !last {
            self.sink.write_all(b",")?;
            self.sink.write_all(NEWLINE)?;
        }
        Ok(())
    }

    /// Writes a complete heap snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the sink fails.
    pub fn write_heap_snapshot(&mut self, heap: &HeapSnapshot) -> Result<(), StreamError> {
        self.sink.write_all(b"{")?;
        self.write_key(SNAPSHOT_KEY)?;
        self.write_value(&heap.snapshot)?;
        self.sink.write_all(b",")?;
        self.sink.write_all(NEWLINE)?;
        let last_index = HEAP_SNAPSHOT_ARRAYS.len() - 1;
        for (index, (key, per_line)) in HEAP_SNAPSHOT_ARRAYS.into_iter().enumerate() {
            let items = heap.array(key).ok_or_else(|| malformed(key))?;
            self.write_array(key, items, per_line, index == last_index)?;
        }
        self.sink.write_all(b"}")?;
        Ok(())
    }

    /// Flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] when the sink fails.
    pub fn flush(&mut self) -> Result<(), StreamError> {
        self.sink.flush()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Timeline Log
// ============================================================================

/// Writes a developer tools timeline log.
///
/// The document is a single array: the quoted user agent first, then one
/// entry per line, closed by `]` and a trailing line break.
///
/// # Errors
///
/// Returns [`StreamError`] when the sink fails.
pub fn write_timeline<W: Write>(
    sink: &mut W,
    user_agent: &str,
    entries: &[ResultValue],
) -> Result<(), StreamError> {
    sink.write_all(b"[")?;
    serde_json::to_writer(&mut *sink, user_agent)?;
    for entry in entries {
        sink.write_all(b",")?;
        sink.write_all(NEWLINE)?;
        serde_json::to_writer(&mut *sink, entry)?;
    }
    sink.write_all(b"]")?;
    sink.write_all(NEWLINE)?;
    Ok(())
}
