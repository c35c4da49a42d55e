// crates/perf-results-core/src/core/category.rs
// ============================================================================
// Module: Perf Results Artifact Categories
// Description: Fixed artifact categories and their on-disk layout.
// Purpose: Map each artifact kind to a results subdirectory and extension.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every artifact written by the recorder belongs to one [`ArtifactCategory`].
//! The category decides the subdirectory under the results root and the file
//! extension; both are part of the external directory contract consumed by
//! reporting tools.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Category
// ============================================================================

/// Artifact categories produced during perf runs.
///
/// # Invariants
/// - Directory names and extensions are stable external contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    /// Serialized framework statistics.
    Stats,
    /// Metrics gold files, grouped by namespace.
    GoldFile,
    /// Memory heap snapshots.
    HeapSnapshot,
    /// JavaScript CPU profiles.
    CpuProfile,
    /// Developer tools timeline logs.
    Timeline,
}

impl ArtifactCategory {
    /// All categories in declaration order.
    pub const ALL: [Self; 5] =
        [Self::Stats, Self::GoldFile, Self::HeapSnapshot, Self::CpuProfile, Self::Timeline];

    /// Returns the subdirectory name under the results root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::GoldFile => "goldfiles",
            Self::HeapSnapshot => "heaps",
            Self::CpuProfile => "profiles",
            Self::Timeline => "timelines",
        }
    }

    /// Returns a human-readable label used in log events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::GoldFile => "gold file",
            Self::HeapSnapshot => "heap snapshot",
            Self::CpuProfile => "CPU profile",
            Self::Timeline => "timeline",
        }
    }

    /// Returns the file extension, including the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::HeapSnapshot => ".heapsnapshot",
            Self::CpuProfile => ".cpuprofile",
            Self::Stats | Self::GoldFile | Self::Timeline => ".json",
        }
    }

    /// Returns the results-root-relative path for a logical artifact name.
    ///
    /// `name` may contain `/`-separated segments, which become nested
    /// directories below the category directory.
    #[must_use]
    pub fn relative_path(self, name: &str) -> String {
        format!("{}/{}{}", self.dir_name(), name, self.extension())
    }

    /// Looks up a category by its directory label, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`CategoryError::Unknown`] when no category uses the label.
    pub fn from_label(label: &str) -> Result<Self, CategoryError> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(label))
            .ok_or_else(|| CategoryError::Unknown(label.to_string()))
    }
}

impl fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ArtifactCategory {
    type Err = CategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_label(value)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Artifact category lookup errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// No category matches the label.
    #[error("unknown artifact category: {0}")]
    Unknown(String),
}
