//! Pipeline configuration for md2web.
//!
//! Project config lives at `<project>/md2web.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Md2WebError, Result};
use crate::path::normalize;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "md2web.toml";

// ---------------------------------------------------------------------------
// Config structs (matching md2web.toml schema)
// ---------------------------------------------------------------------------

/// Top-level pipeline config, deserialized from TOML.
///
/// `route_file_path` and `components_dir` accept either a path or `false`;
/// `false` (or an empty string) disables that output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Md2WebConfig {
    /// Directory scanned for markdown sources.
    #[serde(default = "default_root_dir", alias = "rootDir")]
    pub root_dir: PathBuf,

    /// Output path of the generated route table.
    #[serde(
        default = "default_route_file_path",
        alias = "routeFilePath",
        with = "path_or_false"
    )]
    pub route_file_path: Option<PathBuf>,

    /// Output root for generated components.
    #[serde(
        default = "default_components_dir",
        alias = "componentsDir",
        with = "path_or_false"
    )]
    pub components_dir: Option<PathBuf>,

    /// Module prefix used by the lazy component loaders in the route table.
    #[serde(default = "default_import_prefix", alias = "componentImportPrefix")]
    pub component_import_prefix: String,

    /// Pass raw HTML in markdown sources through instead of escaping it.
    #[serde(default, alias = "allowHtml")]
    pub allow_html: bool,

    /// `[watch]` section.
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Default for Md2WebConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            route_file_path: default_route_file_path(),
            components_dir: default_components_dir(),
            component_import_prefix: default_import_prefix(),
            allow_html: false,
            watch: WatchConfig::default(),
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from("docs")
}
fn default_route_file_path() -> Option<PathBuf> {
    Some(PathBuf::from("src/router/md.ts"))
}
fn default_components_dir() -> Option<PathBuf> {
    Some(PathBuf::from("src/docs"))
}
fn default_import_prefix() -> String {
    "/src/docs".into()
}

/// `[watch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet period before a batch of file changes triggers a rebuild.
    #[serde(default = "default_debounce_ms", alias = "debounceMs")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

impl Md2WebConfig {
    /// Reject configurations where the scan would read its own output.
    ///
    /// Performs no I/O: paths are compared after lexical normalization.
    pub fn validate(&self) -> Result<()> {
        if let Some(components_dir) = &self.components_dir {
            if normalize(&self.root_dir) == normalize(components_dir) {
                return Err(Md2WebError::config(format!(
                    "root_dir and components_dir must be different (both are {})",
                    self.root_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Resolve every configured path against `project_dir`.
    pub fn resolve(&self, project_dir: &Path) -> Self {
        let join = |p: &Path| normalize(&project_dir.join(p));
        Self {
            root_dir: join(self.root_dir.as_path()),
            route_file_path: self.route_file_path.as_deref().map(|p| join(p)),
            components_dir: self.components_dir.as_deref().map(|p| join(p)),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// `path | false` serde helper
// ---------------------------------------------------------------------------

mod path_or_false {
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PathOrFlag {
        Path(PathBuf),
        Flag(bool),
    }

    pub(super) fn serialize<S: Serializer>(
        value: &Option<PathBuf>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(path) => serializer.serialize_str(&path.to_string_lossy()),
            None => serializer.serialize_bool(false),
        }
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PathBuf>, D::Error> {
        match PathOrFlag::deserialize(deserializer)? {
            PathOrFlag::Path(path) if path.as_os_str().is_empty() => Ok(None),
            PathOrFlag::Path(path) => Ok(Some(path)),
            PathOrFlag::Flag(false) => Ok(None),
            PathOrFlag::Flag(true) => Err(D::Error::custom("expected a path or `false`")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config file (`<project_dir>/md2web.toml`).
pub fn config_file_path(project_dir: &Path) -> PathBuf {
    project_dir.join(CONFIG_FILE_NAME)
}

/// Load the project config. Returns defaults if the file does not exist.
pub fn load_config(project_dir: &Path) -> Result<Md2WebConfig> {
    let path = config_file_path(project_dir);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(Md2WebConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<Md2WebConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| Md2WebError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| Md2WebError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `project_dir`.
/// Returns the path to the created file.
pub fn init_config(project_dir: &Path) -> Result<PathBuf> {
    let path = config_file_path(project_dir);
    if path.exists() {
        return Err(Md2WebError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&Md2WebConfig::default())
        .map_err(|e| Md2WebError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| Md2WebError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
