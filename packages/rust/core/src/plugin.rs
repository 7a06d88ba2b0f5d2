//! Build-tool adapter: a validated pipeline bound to a project directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use md2web_shared::path::{is_within, normalize};
use md2web_shared::{Md2WebConfig, Md2WebError, Result};

use crate::pipeline::{ProgressReporter, RunReport, run_pipeline};

/// Name used to tag configuration errors raised by the adapter.
pub const PLUGIN_NAME: &str = "md2web";

/// The content pipeline as a build-tool plugin.
///
/// Construction validates the configuration and resolves every path against
/// the project directory once; nothing touches the filesystem until
/// [`Md2Web::build_start`] or [`Md2Web::handle_hot_update`] runs.
#[derive(Debug, Clone)]
pub struct Md2Web {
    config: Md2WebConfig,
    project_dir: PathBuf,
}

impl Md2Web {
    /// Validate `config` and bind it to `project_dir`.
    ///
    /// Fails with [`Md2WebError::Config`] if `root_dir` and `components_dir`
    /// name the same directory. The check runs on the resolved paths, so `<project>/docs` and `docs`
    /// count as the same directory.
    pub fn new(config: Md2WebConfig, project_dir: impl Into<PathBuf>) -> Result<Self> {
        let project_dir = normalize(&project_dir.into());
        let config = config.resolve(&project_dir);

        config.validate().map_err(|e| match e {
            Md2WebError::Config { message } => {
                Md2WebError::config(format!("[{PLUGIN_NAME}]: {message}"))
            }
            other => other,
        })?;
        debug!(root = %config.root_dir.display(), "plugin configured");

        Ok(Self {
            config,
            project_dir,
        })
    }

    /// The configuration with every path resolved against the project directory.
    pub fn config(&self) -> &Md2WebConfig {
        &self.config
    }

    /// Absolute scan root; changes below it trigger a rebuild.
    pub fn watch_root(&self) -> &Path {
        &self.config.root_dir
    }

    /// Whether a changed path lies under the scan root. Relative paths are
    /// taken relative to the project directory.
    pub fn watches(&self, changed: &Path) -> bool {
        is_within(&self.project_dir.join(changed), self.watch_root())
    }

    /// Run the full pipeline; called once when a build starts.
    pub async fn build_start(&self, progress: &dyn ProgressReporter) -> Result<RunReport> {
        info!("build start");
        run_pipeline(&self.config, progress).await
    }

    /// Re-run the pipeline if `changed` lies under the scan root.
    ///
    /// Returns `Ok(None)` without doing any work for paths outside it.
    pub async fn handle_hot_update(
        &self,
        changed: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<Option<RunReport>> {
        if !self.watches(changed) {
            debug!(path = %changed.display(), "change outside root, ignoring");
            return Ok(None);
        }

        info!(path = %changed.display(), "source changed, regenerating");
        run_pipeline(&self.config, progress).await.map(Some)
    }
}
