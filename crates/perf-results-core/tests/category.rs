// crates/perf-results-core/tests/category.rs
// ============================================================================
// Module: Artifact Category Tests
// Description: Directory layout and label lookup for artifact categories.
// Purpose: Pin the results directory contract.
// Dependencies: perf-results-core
// ============================================================================
//! ## Overview
//! Checks category directories, extensions, and label parsing.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use perf_results_core::ArtifactCategory;
use perf_results_core::CategoryError;

/// Verifies each category maps to its directory and extension.
#[test]
fn relative_paths_follow_layout() {
    assert_eq!(ArtifactCategory::Stats.relative_path("run"), "stats/run.json");
    assert_eq!(ArtifactCategory::GoldFile.relative_path("ui/button"), "goldfiles/ui/button.json");
    assert_eq!(ArtifactCategory::HeapSnapshot.relative_path("leak"), "heaps/leak.heapsnapshot");
    assert_eq!(ArtifactCategory::CpuProfile.relative_path("boot"), "profiles/boot.cpuprofile");
    assert_eq!(ArtifactCategory::Timeline.relative_path("ui_timeline"), "timelines/ui_timeline.json");
}

/// Verifies label lookup ignores case and round-trips through display.
#[test]
fn labels_parse_case_insensitively() {
    for category in ArtifactCategory::ALL {
        assert_eq!(category.to_string().parse::<ArtifactCategory>().unwrap(), category);
        assert_eq!(ArtifactCategory::from_label(&category.dir_name().to_uppercase()).unwrap(), category);
    }
}

/// Verifies unknown labels are rejected.
#[test]
fn unknown_label_is_rejected() {
    let err = "traces".parse::<ArtifactCategory>().unwrap_err();
    assert_eq!(err, CategoryError::Unknown("traces".to_string()));
}
