// crates/perf-results-core/src/core/build.rs
// ============================================================================
// Module: Perf Results Build Metadata
// Description: Build and source-control metadata captured from the environment.
// Purpose: Stamp the results index with the build that produced it.
// Dependencies: crate::interfaces, serde
// ============================================================================

//! ## Overview
//! Build metadata is read once when the recorder starts. Each key has an
//! ordered list of environment variable candidates; the first candidate with
//! a non-blank value wins. Keys without a value are omitted from the output
//! rather than rendered as null or empty strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::value::ResultValue;
use crate::interfaces::EnvSource;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Build metadata keys written to the results index.
///
/// # Invariants
/// - Labels and candidate lists are stable external contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildKey {
    /// CI build number.
    BuildNumber,
    /// CI build identifier.
    BuildId,
    /// Source-control branch.
    GitBranch,
    /// Source-control commit.
    GitCommit,
    /// Version of the tool under test.
    ToolVersion,
    /// Author of the change under test.
    AuthorEmail,
    /// Changelist identifiers included in the build.
    Changelists,
}

/// All build keys in output order.
pub const BUILD_KEYS: [BuildKey; 7] = [
    BuildKey::BuildNumber,
    BuildKey::BuildId,
    BuildKey::GitBranch,
    BuildKey::GitCommit,
    BuildKey::ToolVersion,
    BuildKey::AuthorEmail,
    BuildKey::Changelists,
];

impl BuildKey {
    /// Returns the key label used in the results index.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildNumber => "build_number",
            Self::BuildId => "build_id",
            Self::GitBranch => "git_branch",
            Self::GitCommit => "git_commit",
            Self::ToolVersion => "tool_version",
            Self::AuthorEmail => "author_email",
            Self::Changelists => "changelists",
        }
    }

    /// Returns the environment variable candidates, highest priority first.
    #[must_use]
    pub const fn env_candidates(self) -> &'static [&'static str] {
        match self {
            Self::BuildNumber => &["BUILD_NUMBER"],
            Self::BuildId => &["BUILD_ID"],
            Self::GitBranch => &["GIT_BRANCH", "CURRENT_GIT_BRANCH"],
            Self::GitCommit => &["GIT_COMMIT", "CURRENT_GIT_COMMIT"],
            Self::ToolVersion => &["TOOL_VERSION"],
            Self::AuthorEmail => &["AUTHOR_EMAIL"],
            Self::Changelists => &["CHANGELISTS"],
        }
    }
}

// ============================================================================
// SECTION: Metadata
// ============================================================================

/// Build metadata block embedded in the results index.
///
/// # Invariants
/// - Only keys with a non-blank value are present.
/// - Values are stored as found (not trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildMetadata {
    /// Present keys mapped to their values.
    entries: BTreeMap<String, String>,
}

impl BuildMetadata {
    /// Captures build metadata from an environment source.
    #[must_use]
    pub fn capture<E: EnvSource + ?Sized>(env: &E) -> Self {
        let entries = BUILD_KEYS
            .into_iter()
            .filter_map(|key| {
                first_non_blank(env, key.env_candidates())
                    .map(|value| (key.as_str().to_string(), value))
            })
            .collect();
        Self {
            entries,
        }
    }

    /// Returns the value recorded for a key.
    #[must_use]
    pub fn get(&self, key: BuildKey) -> Option<&str> {
        self.entries.get(key.as_str()).map(String::as_str)
    }

    /// Returns the number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no key was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the metadata as the `build` block of the results index.
    #[must_use]
    pub fn to_value(&self) -> ResultValue {
        self.entries
            .iter()
            .map(|(key, value)| (key.clone(), ResultValue::String(value.clone())))
            .collect()
    }
}

/// Returns the first candidate whose value is not blank.
fn first_non_blank<E: EnvSource + ?Sized>(env: &E, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|name| env.var(name))
        .find(|value| !value.trim().is_empty())
}
