// crates/perf-results-core/src/interfaces/mod.rs
// ============================================================================
// Module: Perf Results Interfaces
// Description: Seams for environment lookups and structured event logging.
// Purpose: Keep the recorder independent of process globals and log backends.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Interfaces define how the recorder reaches the outside world without
//! binding to it: [`EnvSource`] supplies environment values for build
//! metadata, and [`ResultsEventSink`] receives structured events for every
//! write, failure, and flush. Recorder entry points never return errors to
//! their callers, so events are the only record of a failed artifact.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Environment Source
// ============================================================================

/// Read-only environment lookup.
pub trait EnvSource {
    /// Returns the value of a variable, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Environment source backed by the process environment.
///
/// Values that are not valid UTF-8 are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).and_then(|raw| raw.into_string().ok())
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Severity of a recorder event.
///
/// # Invariants
/// - Variants are stable for log filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    /// Normal progress.
    Info,
    /// A failure that was logged and swallowed.
    Warn,
}

/// Structured recorder event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsEvent {
    /// Stable event label (for example `artifact_written`).
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event severity.
    pub level: EventLevel,
    /// Human-readable label of the artifact or index involved.
    pub what: String,
    /// Destination path when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Failure detail when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResultsEvent {
    /// Creates an informational event.
    #[must_use]
    pub fn info(event: &'static str, what: impl Into<String>) -> Self {
        Self::new(event, EventLevel::Info, what.into())
    }

    /// Creates a warning event.
    #[must_use]
    pub fn warn(event: &'static str, what: impl Into<String>) -> Self {
        Self::new(event, EventLevel::Warn, what.into())
    }

    /// Attaches the destination path.
    #[must_use]
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    /// Attaches a failure detail.
    #[must_use]
    pub fn with_message(mut self, message: impl fmt::Display) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Builds an event stamped with the current time.
    fn new(event: &'static str, level: EventLevel, what: String) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event,
            timestamp_ms,
            level,
            what,
            path: None,
            message: None,
        }
    }
}

/// Receiver for recorder events.
pub trait ResultsEventSink: Send + Sync {
    /// Records an event. Implementations must not panic.
    fn emit(&self, event: &ResultsEvent);
}
