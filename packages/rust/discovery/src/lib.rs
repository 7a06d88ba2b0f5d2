//! Markdown source discovery.
//!
//! Walks the scan root breadth-first with an explicit work queue and collects
//! every file whose name ends in `.md` or `.MD`. Directories are tracked by
//! canonical path so symlink cycles cannot keep the walk alive.

use std::collections::{HashSet, VecDeque};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, instrument, trace};

use md2web_shared::{Md2WebError, Result, SourceFile};

/// File name suffixes accepted as markdown sources. Matching is exact, so
/// mixed-case variants such as `.Md` are not picked up.
const MARKDOWN_SUFFIXES: [&str; 2] = [".md", ".MD"];

/// Whether a file name carries one of the accepted markdown suffixes.
pub fn is_markdown(name: &OsStr) -> bool {
    let bytes = name.as_encoded_bytes();
    MARKDOWN_SUFFIXES
        .iter()
        .any(|suffix| bytes.ends_with(suffix.as_bytes()))
}

/// Collect every markdown file below `root`.
///
/// Order is breadth-first by directory level; entries within one directory
/// are visited in file-name order. Entries are stat'ed through symlinks.
///
/// Fails with [`Md2WebError::Io`] if `root` (or any entry below it) cannot be
/// read.
#[instrument(skip_all, fields(root = %root.display()))]
pub async fn discover(root: &Path) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    let mut queue = VecDeque::from([root.to_path_buf()]);
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(dir) = queue.pop_front() {
        let canonical = fs::canonicalize(&dir)
            .await
            .map_err(|e| Md2WebError::io(&dir, e))?;
        if !visited.insert(canonical) {
            debug!(dir = %dir.display(), "directory already visited, skipping");
            continue;
        }

        for name in read_sorted(&dir).await? {
            let full_path = dir.join(&name);
            let meta = fs::metadata(&full_path)
                .await
                .map_err(|e| Md2WebError::io(&full_path, e))?;

            if meta.is_dir() {
                queue.push_back(full_path);
            } else if meta.is_file() && is_markdown(&name) {
                trace!(path = %full_path.display(), "found markdown source");
                files.push(SourceFile::new(full_path, root));
            }
        }
    }

    info!(count = files.len(), dirs = visited.len(), "discovery complete");
    Ok(files)
}

/// List a directory's entry names, sorted.
async fn read_sorted(dir: &Path) -> Result<Vec<OsString>> {
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|e| Md2WebError::io(dir, e))?;

    let mut names = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .map_err(|e| Md2WebError::io(dir, e))?
    {
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "# x").unwrap();
    }

    fn relatives(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative().unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn suffix_filter() {
        assert!(is_markdown(OsStr::new("cat.md")));
        assert!(is_markdown(OsStr::new("CAT.MD")));
        assert!(!is_markdown(OsStr::new("cat.Md")));
        assert!(!is_markdown(OsStr::new("cat.mD")));
        assert!(!is_markdown(OsStr::new("cat.markdown")));
        assert!(!is_markdown(OsStr::new("cat.md.txt")));
        assert!(!is_markdown(OsStr::new("md")));
    }

    #[tokio::test]
    async fn finds_only_markdown_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        touch(&root, "a.md");
        touch(&root, "b.MD");
        touch(&root, "c.Md");
        touch(&root, "d.txt");
        touch(&root, "nested/e.md");
        touch(&root, "nested/f.markdown");

        let files = discover(&root).await.unwrap();
        assert_eq!(relatives(&files), vec!["a.md", "b.MD", "nested/e.md"]);
        assert!(files.iter().all(|f| f.root == root));
    }

    #[tokio::test]
    async fn breadth_first_order() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        touch(&root, "a/deep/x.md");
        touch(&root, "b/y.md");
        touch(&root, "z.md");
        touch(&root, "a/w.md");

        let files = discover(&root).await.unwrap();
        assert_eq!(
            relatives(&files),
            vec!["z.md", "a/w.md", "b/y.md", "a/deep/x.md"]
        );
    }

    #[tokio::test]
    async fn empty_directories_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        std::fs::create_dir_all(root.join("empty/also-empty")).unwrap();

        let files = discover(&root).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nope");

        let err = discover(&root).await.unwrap_err();
        match err {
            Md2WebError::Io { path, .. } => assert_eq!(path, root),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlink_cycle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        touch(&root, "sub/page.md");
        std::os::unix::fs::symlink(&root, root.join("sub/loop")).unwrap();

        let files = discover(&root).await.unwrap();
        assert_eq!(relatives(&files), vec!["sub/page.md"]);
    }
}
