//! Lexical path helpers.
//!
//! Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Normalize a path without consulting the filesystem.
///
/// Drops `.` components and trailing separators, and folds `..` into the
/// preceding normal component where one exists. Leading `..` components of
/// relative paths are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Whether `path` lies inside `root` (or is `root` itself), comparing whole
/// components after normalization. `docs-old/a.md` is not under `docs`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

/// Whether the file name looks like an editor swap or backup file.
pub fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_cur_dir_and_trailing_slash() {
        assert_eq!(normalize(Path::new("./docs/")), PathBuf::from("docs"));
        assert_eq!(normalize(Path::new("docs/./a")), PathBuf::from("docs/a"));
        assert_eq!(normalize(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn normalize_folds_parent_dir() {
        assert_eq!(normalize(Path::new("src/../docs")), PathBuf::from("docs"));
        assert_eq!(normalize(Path::new("../docs")), PathBuf::from("../docs"));
        assert_eq!(normalize(Path::new("/../docs")), PathBuf::from("/docs"));
    }

    #[test]
    fn is_within_compares_components() {
        assert!(is_within(Path::new("/p/docs/a.md"), Path::new("/p/docs")));
        assert!(is_within(Path::new("/p/docs"), Path::new("/p/docs/")));
        assert!(!is_within(Path::new("/p/docs-old/a.md"), Path::new("/p/docs")));
        assert!(!is_within(Path::new("/p/src/docs/a.md"), Path::new("/p/docs")));
    }

    #[test]
    fn temp_files() {
        assert!(is_temp_file(Path::new("docs/.a.md.swp")));
        assert!(is_temp_file(Path::new("docs/a.md~")));
        assert!(is_temp_file(Path::new("docs/.index.vue.tmp")));
        assert!(!is_temp_file(Path::new("docs/a.md")));
    }
}
