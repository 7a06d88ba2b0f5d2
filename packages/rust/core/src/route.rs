//! Route derivation: source file path → URL path, dotted name, component module.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use md2web_markdown::component_file_name;
use md2web_shared::SourceFile;

/// Splits a path on separators and the extension dot.
static SEGMENT_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\.]").expect("valid regex"));

/// A route entry for the generated route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Slash-joined URL path, without the leading `/` (e.g. `mammal/cats/cat`).
    pub path: String,
    /// Dot-joined symbolic name (e.g. `mammal.cats.cat`).
    pub name: String,
    /// Module loaded lazily by the router (e.g. `/src/docs/mammal/cats/cat/index.vue`).
    pub component: String,
}

impl RouteDescriptor {
    /// Build a descriptor from already-derived segments.
    pub fn from_segments(segments: &[String], import_prefix: &str) -> Self {
        let path = segments.join("/");
        let component = join_module(import_prefix, &path);
        Self {
            name: segments.join("."),
            path,
            component,
        }
    }

    /// Derive the descriptor for a discovered source file.
    pub fn for_source(file: &SourceFile, import_prefix: &str) -> Self {
        Self::from_segments(&source_segments(file), import_prefix)
    }
}

/// Derive route segments from a path string whose first segment is the root
/// directory: split on separators and `.`, drop the first segment and the
/// extension.
///
/// `docs/mammal/cats/cat.md` → `["mammal", "cats", "cat"]`.
pub fn derive_segments(path: &str) -> Vec<String> {
    let mut parts = split(path);
    if parts.is_empty() {
        return parts;
    }
    parts.remove(0);
    parts.pop();
    parts
}

/// Derive route segments for a source file, stripping its whole scan root so
/// multi-component roots (`content/docs`) behave like `docs`.
///
/// Discovery only yields files under their root. A `SourceFile` built by a
/// library caller may not be, and then the first path segment is dropped
/// instead, as [`derive_segments`] does.
pub fn source_segments(file: &SourceFile) -> Vec<String> {
    match file.relative() {
        Some(relative) => {
            let mut parts = split(&relative.to_string_lossy());
            parts.pop();
            parts
        }
        None => derive_segments(&file.path.to_string_lossy()),
    }
}

/// Where the component for a source file is written: `<components_dir>/<path>/index.vue`.
pub fn component_path(components_dir: &Path, segments: &[String]) -> PathBuf {
    let mut target = components_dir.to_path_buf();
    target.extend(segments);
    target.push(component_file_name());
    target
}

fn split(path: &str) -> Vec<String> {
    SEGMENT_SPLIT
        .split(path)
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

fn join_module(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let file = component_file_name();
    if path.is_empty() {
        format!("{prefix}/{file}")
    } else {
        format!("{prefix}/{path}/{file}")
    }
}
