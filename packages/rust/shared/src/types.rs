//! Core domain types shared by the md2web crates.

use std::path::{Path, PathBuf};

/// A markdown source file found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path: the scan root joined with the entry names leading here.
    pub path: PathBuf,
    /// The scan root this file was discovered under.
    pub root: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Path relative to the scan root, if the file lies under it.
    pub fn relative(&self) -> Option<&Path> {
        self.path.strip_prefix(&self.root).ok()
    }
}
