// crates/perf-results-config/src/config.rs
// ============================================================================
// Module: Perf Results Configuration
// Description: Configuration loading and validation for the perf recorder.
// Purpose: Resolve the results root and event sink with hard input limits.
// Dependencies: perf-results-core, perf-results-store, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is an optional TOML file. The path comes from the caller,
//! then the `PERF_RESULTS_CONFIG` environment variable, then
//! `perf-results.toml` in the working directory. Only the last one may be
//! absent; an explicitly named file that cannot be read is an error.
//!
//! The results root is taken from `PERF_RESULTS_DIR`, then `results_dir`,
//! then `target/perf/results`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use perf_results_core::BuildMetadata;
use perf_results_core::EnvSource;
use perf_results_core::ProcessEnv;
use perf_results_core::ResultsEvent;
use perf_results_core::ResultsEventSink;
use perf_results_store::FileEventSink;
use perf_results_store::NoopEventSink;
use perf_results_store::ResultsSession;
use perf_results_store::StderrEventSink;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "perf-results.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "PERF_RESULTS_CONFIG";
/// Environment variable used to override the results root.
pub const RESULTS_DIR_ENV_VAR: &str = "PERF_RESULTS_DIR";
/// Results root used when neither the environment nor the config names one.
pub const DEFAULT_RESULTS_DIR: &str = "target/perf/results";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Perf recorder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerfResultsConfig {
    /// Results root; relative paths resolve against the working directory.
    #[serde(default)]
    pub results_dir: Option<String>,
    /// Event logging configuration.
    #[serde(default)]
    pub events: EventsConfig,
}

/// Event logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventsConfig {
    /// Destination for recorder events.
    #[serde(default)]
    pub sink: EventSinkKind,
    /// Event log path (JSON lines); required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

/// Destinations for recorder events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `events.path`.
    File,
    /// Events are discarded.
    None,
}

impl PerfResultsConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &ProcessEnv)
    }

    /// Loads configuration, resolving the default path through `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an explicitly named file cannot be read,
    /// exceeds the size limit, is not UTF-8, fails to parse, or fails
    /// validation.
    pub fn load_with_env<E: EnvSource + ?Sized>(
        path: Option<&Path>,
        env: &E,
    ) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, env)?;
        validate_path(&resolved)?;
        let bytes = match fs::read(&resolved) {
            Ok(bytes) => bytes,
            Err(err) if !explicit && err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(format!("{}: {err}", resolved.display()))),
        };
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.results_dir {
            validate_path_string("results_dir", dir)?;
        }
        self.events.validate()
    }

    /// Resolves the results root without touching the filesystem.
    #[must_use]
    pub fn resolve_results_dir<E: EnvSource + ?Sized>(&self, env: &E) -> PathBuf {
        if let Some(dir) = env.var(RESULTS_DIR_ENV_VAR)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir.trim());
        }
        self.results_dir
            .as_deref()
            .map(str::trim)
            .map_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR), PathBuf::from)
    }

    /// Resolves, creates, and canonicalizes the results root.
    ///
    /// Creation and canonicalization are best effort: on failure the raw
    /// path is returned and the failure is reported as a warning.
    pub fn prepare_results_dir<E: EnvSource + ?Sized>(
        &self,
        env: &E,
        events: &dyn ResultsEventSink,
    ) -> PathBuf {
        let raw = self.resolve_results_dir(env);
        let prepared = fs::create_dir_all(&raw).and_then(|()| fs::canonicalize(&raw));
        match prepared {
            Ok(root) => {
                events.emit(&ResultsEvent::info("results_dir_resolved", "results root").with_path(&root));
                root
            }
            Err(err) => {
                events.emit(
                    &ResultsEvent::warn("results_dir_resolved", "results root")
                        .with_path(&raw)
                        .with_message(&err),
                );
                raw
            }
        }
    }

    /// Builds the configured event sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the event log cannot be opened.
    pub fn build_event_sink(&self) -> Result<Arc<dyn ResultsEventSink>, ConfigError> {
        match self.events.sink {
            EventSinkKind::Stderr => Ok(Arc::new(StderrEventSink)),
            EventSinkKind::None => Ok(Arc::new(NoopEventSink)),
            EventSinkKind::File => {
                let path = self.events.path.as_deref().map(str::trim).ok_or_else(|| {
                    ConfigError::Invalid("events.path is required for the file sink".to_string())
                })?;
                let sink = FileEventSink::new(Path::new(path))
                    .map_err(|err| ConfigError::Io(format!("{path}: {err}")))?;
                Ok(Arc::new(sink))
            }
        }
    }

    /// Opens a results session for the current run.
    ///
    /// Build metadata and the results root are read from `env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the event sink cannot be built.
    pub fn open_session<E: EnvSource + ?Sized>(&self, env: &E) -> Result<ResultsSession, ConfigError> {
        let events = self.build_event_sink()?;
        let root = self.prepare_results_dir(env, events.as_ref());
        Ok(ResultsSession::open(root, BuildMetadata::capture(env), events))
    }
}

impl EventsConfig {
    /// Validates event logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("events.path", path)?;
        }
        if self.sink == EventSinkKind::File && self.path.is_none() {
            return Err(ConfigError::Invalid(
                "events.path is required for the file sink".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is true when the path was named.
fn resolve_path<E: EnvSource + ?Sized>(
    path: Option<&Path>,
    env: &E,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env.var(CONFIG_ENV_VAR)
        && !env_path.trim().is_empty()
    {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
