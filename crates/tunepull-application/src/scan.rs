// SPDX-License-Identifier: GPL-3.0-or-later

//! Recursive folder scan for M4A files.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),
    #[error("I/O error: {0}")]
    Io(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Collect every `.m4a` file under the root, recursively, sorted by
/// path. Symlinks are skipped.
pub fn scan_m4a_files(root: impl AsRef<Path>) -> Result<Vec<ScannedFile>, ScanError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(ScanError::PathNotFound(root.display().to_string()));
    }

    let mut scanned = Vec::new();
    visit_directory(root, &mut scanned)?;
    scanned.sort_by(|left, right| left.path.cmp(&right.path));
    Ok(scanned)
}

fn visit_directory(directory: &Path, scanned: &mut Vec<ScannedFile>) -> Result<(), ScanError> {
    let entries = fs::read_dir(directory).map_err(|err| ScanError::Io(err.to_string()))?;

    for entry in entries {
        let entry = entry.map_err(|err| ScanError::Io(err.to_string()))?;
        let path = entry.path();

        let file_type = entry
            .file_type()
            .map_err(|err| ScanError::Io(err.to_string()))?;

        if file_type.is_symlink() {
            continue;
        }

        if file_type.is_dir() {
            visit_directory(&path, scanned)?;
            continue;
        }

        let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        if !extension.eq_ignore_ascii_case("m4a") {
            continue;
        }

        let metadata = fs::metadata(&path).map_err(|err| ScanError::Io(err.to_string()))?;
        scanned.push(ScannedFile {
            path,
            size_bytes: metadata.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_recursively_and_filters_extension() {
        let root = tempfile::tempdir().expect("temp dir");
        let album_dir = root.path().join("artist").join("album");
        fs::create_dir_all(&album_dir).expect("nested dirs");

        let audio = album_dir.join("01 - Track.m4a");
        let upper = album_dir.join("02 - Track.M4A");
        let image = album_dir.join("cover.jpg");
        let mp3 = album_dir.join("03 - Track.mp3");
        for file in [&audio, &upper, &image, &mp3] {
            fs::write(file, b"data").expect("file should exist");
        }

        let scanned = scan_m4a_files(root.path()).expect("scan should succeed");

        let paths: Vec<_> = scanned.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![audio, upper]);
    }

    #[test]
    fn missing_root_is_reported() {
        let result = scan_m4a_files("/nonexistent/music");
        assert!(matches!(result, Err(ScanError::PathNotFound(_))));
    }

    #[test]
    fn empty_tree_yields_no_files() {
        let root = tempfile::tempdir().expect("temp dir");
        let scanned = scan_m4a_files(root.path()).expect("scan should succeed");
        assert!(scanned.is_empty());
    }
}
