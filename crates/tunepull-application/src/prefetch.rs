// SPDX-License-Identifier: GPL-3.0-or-later

//! Bounded, strictly sequential metadata prefetch.

use std::path::PathBuf;

use tracing::{debug, warn};
use tunepull_domain::LocalMetadata;

use crate::tag_reader::{read_local_metadata, TagReadError};

#[derive(Debug, Default)]
pub struct PrefetchOutcome {
    pub loaded: Vec<LocalMetadata>,
    pub failures: Vec<(PathBuf, TagReadError)>,
    /// Files beyond the prefix cap, left for on-demand loading.
    pub skipped: usize,
}

/// Read metadata for a bounded prefix of the given paths, one file at a
/// time in order.
///
/// The cap and the sequential ordering are deliberate: they bound
/// worst-case resource use and keep the observable request pacing of a
/// large selection unchanged. Do not parallelize.
pub fn prefetch_metadata(paths: &[PathBuf], max_files: usize) -> PrefetchOutcome {
    let mut outcome = PrefetchOutcome {
        skipped: paths.len().saturating_sub(max_files),
        ..Default::default()
    };

    for path in paths.iter().take(max_files) {
        match read_local_metadata(path) {
            Ok(metadata) => outcome.loaded.push(metadata),
            Err(error) => {
                warn!(
                    target: "prefetch",
                    file = %path.display(),
                    error = %error,
                    "metadata prefetch failed"
                );
                outcome.failures.push((path.clone(), error));
            }
        }
    }

    debug!(
        target: "prefetch",
        loaded = outcome.loaded.len(),
        failed = outcome.failures.len(),
        skipped = outcome.skipped,
        "prefetch complete"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_bounds_the_processed_prefix() {
        let dir = tempfile::tempdir().expect("temp dir");
        let paths: Vec<PathBuf> = (0..4)
            .map(|i| {
                let path = dir.path().join(format!("{i}.m4a"));
                std::fs::write(&path, b"not a real container").expect("file");
                path
            })
            .collect();

        let outcome = prefetch_metadata(&paths, 2);
        // Both attempted files fail to parse, but only two were touched.
        assert_eq!(outcome.loaded.len() + outcome.failures.len(), 2);
        assert_eq!(outcome.skipped, 2);
    }

    #[test]
    fn failures_are_collected_in_input_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let existing = dir.path().join("a.m4a");
        std::fs::write(&existing, b"garbage").expect("file");
        let missing = dir.path().join("b.m4a");

        let outcome = prefetch_metadata(&[existing.clone(), missing.clone()], 10);

        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].0, existing);
        assert!(matches!(outcome.failures[0].1, TagReadError::Parse(_)));
        assert_eq!(outcome.failures[1].0, missing);
        assert!(matches!(outcome.failures[1].1, TagReadError::FileNotFound(_)));
        assert_eq!(outcome.skipped, 0);
    }
}
