// crates/perf-results-core/src/runtime/path_index.rs
// ============================================================================
// Module: Perf Results Path Index
// Description: In-memory directory tree of recorded artifact file names.
// Purpose: Back the Results.json index with sorted per-directory file lists.
// Dependencies: crate::core::value, thiserror
// ============================================================================

//! ## Overview
//! [`PathIndex`] mirrors the results directory hierarchy. Each node is keyed by
//! a directory segment; nodes that have had files recorded carry a file list
//! kept in ascending ordinal order by ordered insertion. Rendering the index
//! yields the nested `{segment: {..., "list": [...]}}` shape of `Results.json`.
//!
//! The index trusts callers to split paths into segments; it only rejects
//! segments that cannot be represented in the rendered tree.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::ResultValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key holding the sorted file list at each rendered node.
pub const LIST_KEY: &str = "list";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Path index bookkeeping errors.
///
/// # Invariants
/// - A rejected operation leaves the index unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A directory segment was empty.
    #[error("empty directory segment in results path")]
    EmptySegment,
    /// A directory segment collides with the file list key.
    #[error("directory segment is reserved: {0}")]
    ReservedSegment(String),
    /// The file name was empty.
    #[error("empty file name in results path")]
    EmptyFileName,
}

// ============================================================================
// SECTION: Index
// ============================================================================

/// Node of the path index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PathNode {
    /// Child directories keyed by segment.
    children: BTreeMap<String, PathNode>,
    /// Sorted file names; `None` until a file is recorded here.
    files: Option<Vec<String>>,
}

/// Directory-shaped index of recorded artifact files.
///
/// # Invariants
/// - Every file list is sorted ascending by ordinal string comparison.
/// - A file name appears at most once per directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    /// Node for the results root.
    root: PathNode,
}

impl PathIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `file_name` under the directory named by `segments`.
    ///
    /// Missing intermediate nodes are created. Recording a name that is
    /// already present leaves the list unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] when a segment or the file name cannot be
    /// represented; the index is not modified in that case.
    pub fn record<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        file_name: &str,
    ) -> Result<(), IndexError> {
        validate_segments(segments)?;
        if file_name.is_empty() {
            return Err(IndexError::EmptyFileName);
        }
        let mut node = &mut self.root;
        for segment in segments {
            node = node.children.entry(segment.as_ref().to_string()).or_default();
        }
        let files = node.files.get_or_insert_with(Vec::new);
        if let Err(position) = files.binary_search_by(|entry| entry.as_str().cmp(file_name)) {
            files.insert(position, file_name.to_string());
        }
        Ok(())
    }

    /// Removes `file_name` from the directory named by `segments`.
    ///
    /// Returns true when an entry was removed. Unknown directories and names
    /// are a no-op.
    pub fn remove<S: AsRef<str>>(&mut self, segments: &[S], file_name: &str) -> bool {
        let mut node = &mut self.root;
        for segment in segments {
            match node.children.get_mut(segment.as_ref()) {
                Some(child) => node = child,
                None => return false,
            }
        }
        let Some(files) = node.files.as_mut() else {
            return false;
        };
        match files.binary_search_by(|entry| entry.as_str().cmp(file_name)) {
            Ok(position) => {
                files.remove(position);
                true
            }
            Err(_) => false,
        }
    }

    /// Returns the sorted file list recorded for a directory.
    #[must_use]
    pub fn files<S: AsRef<str>>(&self, segments: &[S]) -> Option<&[String]> {
        let mut node = &self.root;
        for segment in segments {
            node = node.children.get(segment.as_ref())?;
        }
        node.files.as_deref()
    }

    /// Returns the total number of file entries across all directories.
    #[must_use]
    pub fn file_count(&self) -> usize {
        count_files(&self.root)
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && self.root.files.is_none()
    }

    /// Renders the index as the nested `Results.json` results tree.
    #[must_use]
    pub fn to_value(&self) -> ResultValue {
        render_node(&self.root)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects segments that cannot appear in the rendered tree.
fn validate_segments<S: AsRef<str>>(segments: &[S]) -> Result<(), IndexError> {
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            return Err(IndexError::EmptySegment);
        }
        if segment == LIST_KEY {
            return Err(IndexError::ReservedSegment(segment.to_string()));
        }
    }
    Ok(())
}

/// Counts file entries below a node.
fn count_files(node: &PathNode) -> usize {
    node.files.as_ref().map_or(0, Vec::len) + node.children.values().map(count_files).sum::<usize>()
}

/// Renders one node and its descendants.
fn render_node(node: &PathNode) -> ResultValue {
    let mut entries: BTreeMap<String, ResultValue> = node
        .children
        .iter()
        .map(|(segment, child)| (segment.clone(), render_node(child)))
        .collect();
    if let Some(files) = &node.files {
        let list = files.iter().map(|name| ResultValue::String(name.clone())).collect();
        entries.insert(LIST_KEY.to_string(), ResultValue::List(list));
    }
    ResultValue::Map(entries)
}
