// crates/perf-results-store/src/output.rs
// ============================================================================
// Module: Perf Results Output Helpers
// Description: Name validation and file writers shared by the recorder.
// Purpose: Keep artifact paths under the results root and index writes atomic.
// Dependencies: perf-results-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! Artifact payloads are streamed straight to their destination; a failed
//! write may leave a partial file behind. Index files (`Results.json`,
//! `_all.json`) are written to a temporary file in the destination directory
//! and renamed into place, so readers never observe a half-written index.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Component;
use std::path::Path;

use perf_results_core::StreamError;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::RecordError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total length of an artifact name.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a logical artifact name as a canonical relative file path.
///
/// Segments are `/`-separated; empty and `.` segments are rejected so each
/// name maps to exactly one namespace and one file.
pub(crate) fn validate_artifact_name(name: &str) -> Result<(), RecordError> {
    if name.is_empty() || name.ends_with('/') {
        return Err(RecordError::InvalidName(format!("{name:?} does not name a file")));
    }
    if name.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(RecordError::InvalidName("artifact name exceeds limit".to_string()));
    }
    if name.split('/').any(|segment| segment.is_empty() || segment == ".") {
        return Err(RecordError::InvalidName(format!("{name:?} is not a canonical path")));
    }
    validate_relative(Path::new(name))
}

/// Rejects absolute paths, parent traversal, and overlong components.
pub(crate) fn validate_relative(candidate: &Path) -> Result<(), RecordError> {
    for component in candidate.components() {
        match component {
            Component::ParentDir => {
                return Err(RecordError::InvalidName(
                    "artifact name escapes results root".to_string(),
                ));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(RecordError::InvalidName(
                    "absolute artifact name not allowed".to_string(),
                ));
            }
            Component::Normal(value) if value.len() > MAX_PATH_COMPONENT_LENGTH => {
                return Err(RecordError::InvalidName(
                    "artifact name component too long".to_string(),
                ));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Writers
// ============================================================================

/// Creates the parent directory of `path` when missing.
fn ensure_parent(path: &Path) -> Result<&Path, RecordError> {
    let parent = path
        .parent()
        .ok_or_else(|| RecordError::InvalidPath(format!("{} has no parent", path.display())))?;
    fs::create_dir_all(parent)?;
    Ok(parent)
}

/// Streams an artifact payload to `path` through a buffered writer.
pub(crate) fn write_streamed<F>(path: &Path, encode: F) -> Result<(), RecordError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), StreamError>,
{
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    encode(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes `value` as compact JSON, replacing `path` atomically.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), RecordError> {
    let parent = ensure_parent(path)?;
    let mut temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(&mut temp);
        serde_json::to_writer(&mut writer, value).map_err(StreamError::from)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| RecordError::Io(err.error.to_string()))?;
    Ok(())
}
