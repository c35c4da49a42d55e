// crates/perf-results-store/tests/proptest_writer.rs
// ============================================================================
// Module: Artifact Writer Property Tests
// Description: Property checks for nested artifact names.
// Purpose: Validate that every written artifact is indexed at its directory.
// Dependencies: perf-results-store, proptest, tempfile
// ============================================================================
//! ## Overview
//! Nested names map to nested directories; every successful write must be
//! reflected in the index, and parent traversal must never be written.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use common::TestRoot;
use perf_results_core::ArtifactCategory;
use proptest::prelude::*;

/// Names of one to three lowercase segments.
fn nested_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}(/[a-z]{1,6}){0,2}", 1 .. 12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn written_names_are_indexed(names in nested_names()) {
        let fixture = TestRoot::new();
        let session = fixture.session();
        for name in &names {
            let path = session.writer().write_stats(name, "{}");
            prop_assert!(path.is_file());
        }
        for name in &names {
            let mut segments: Vec<&str> = vec![ArtifactCategory::Stats.dir_name()];
            let (dirs, file) = name.rsplit_once('/').unwrap_or(("", name.as_str()));
            segments.extend(dirs.split('/').filter(|segment| !segment.is_empty()));
            let listed = session.registry().files(&segments).unwrap_or_default();
            let expected = format!("{file}.json");
            prop_assert!(listed.contains(&expected));
        }
    }

    #[test]
    fn traversal_is_never_written(prefix in "[a-z]{0,4}", suffix in "[a-z]{1,4}") {
        let fixture = TestRoot::new();
        let session = fixture.session();
        let name = if prefix.is_empty() { format!("../{suffix}") } else { format!("{prefix}/../../{suffix}") };
        let path = session.writer().write_stats(&name, "{}");
        prop_assert!(!path.exists());
        prop_assert!(!fixture.root().join("stats").exists());
    }
}
