// crates/perf-results-store/src/events.rs
// ============================================================================
// Module: Perf Results Event Sinks
// Description: Structured JSON-lines sinks for recorder events.
// Purpose: Route write and flush events to stderr, a file, or memory.
// Dependencies: perf-results-core, serde_json
// ============================================================================

//! ## Overview
//! Recorder events are serialized as one JSON object per line. Sinks never
//! fail outward: an event that cannot be written is dropped, because logging
//! must not fail the perf run either.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use perf_results_core::ResultsEvent;
use perf_results_core::ResultsEventSink;

// ============================================================================
// SECTION: Stderr Sink
// ============================================================================

/// Event sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrEventSink;

impl ResultsEventSink for StderrEventSink {
    fn emit(&self, event: &ResultsEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Event sink that appends JSON lines to a file.
#[derive(Debug)]
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ResultsEventSink for FileEventSink {
    fn emit(&self, event: &ResultsEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

// ============================================================================
// SECTION: Noop Sink
// ============================================================================

/// Event sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl ResultsEventSink for NoopEventSink {
    fn emit(&self, _event: &ResultsEvent) {}
}

// ============================================================================
// SECTION: Memory Sink
// ============================================================================

/// Event sink that keeps events in memory for later inspection.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    /// Collected events in emission order.
    events: Mutex<Vec<ResultsEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ResultsEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the labels of the collected events.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).iter().map(|event| event.event).collect()
    }
}

impl ResultsEventSink for MemoryEventSink {
    fn emit(&self, event: &ResultsEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}
