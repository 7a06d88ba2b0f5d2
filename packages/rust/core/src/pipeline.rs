//! End-to-end pipeline: discover → (route table ‖ components).

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use md2web_markdown::RenderOptions;
use md2web_shared::{GenerationTask, Md2WebConfig, Md2WebError, Result, TaskFailure};

use crate::components::generate_components;
use crate::routes::generate_routes;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Number of markdown sources discovered.
    pub files: usize,
    /// Route table written, if route generation is enabled.
    pub route_file: Option<PathBuf>,
    /// Number of routes in the table.
    pub routes: usize,
    /// Output root of the components, if component generation is enabled.
    pub components_dir: Option<PathBuf>,
    /// Number of component files written.
    pub components: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each component file is written.
    fn component_written(&self, path: &Path, current: usize, total: usize);
    /// Called when the run completes successfully.
    fn done(&self, report: &RunReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn component_written(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self, _report: &RunReport) {}
}

/// Run the full pipeline once.
///
/// 1. Discover markdown sources under `root_dir`
/// 2. Write the route table (unless `route_file_path` is disabled)
/// 3. Write the components (unless `components_dir` is disabled)
///
/// Steps 2 and 3 run concurrently. Both are always driven to completion;
/// if either fails, the error lists every failed task.
#[instrument(skip_all, fields(root = %config.root_dir.display()))]
pub async fn run_pipeline(
    config: &Md2WebConfig,
    progress: &dyn ProgressReporter,
) -> Result<RunReport> {
    let start = Instant::now();
    config.validate()?;

    progress.phase("Discovering markdown sources");
    let files = md2web_discovery::discover(&config.root_dir).await?;

    progress.phase("Generating routes and components");
    let render_opts = RenderOptions {
        allow_html: config.allow_html,
    };

    let routes_task = async {
        match &config.route_file_path {
            Some(target) => generate_routes(&files, target, &config.component_import_prefix)
                .await
                .map(Some),
            None => Ok(None),
        }
    };
    let components_task = async {
        match &config.components_dir {
            Some(dir) => generate_components(&files, dir, &render_opts, progress)
                .await
                .map(Some),
            None => Ok(None),
        }
    };

    let (routes, components) = tokio::join!(routes_task, components_task);

    let mut failures = Vec::new();
    let routes = collect(routes, GenerationTask::Routes, &mut failures);
    let components = collect(components, GenerationTask::Components, &mut failures);

    if !failures.is_empty() {
        return Err(Md2WebError::Generation { failures });
    }

    let report = RunReport {
        files: files.len(),
        route_file: config.route_file_path.clone(),
        routes: routes.unwrap_or(0),
        components_dir: config.components_dir.clone(),
        components: components.unwrap_or(0),
        elapsed: start.elapsed(),
    };

    progress.done(&report);

    info!(
        files = report.files,
        routes = report.routes,
        components = report.components,
        elapsed_ms = report.elapsed.as_millis(),
        "pipeline complete"
    );

    Ok(report)
}

/// Record a failed task, passing successful counts through.
fn collect(
    outcome: Result<Option<usize>>,
    task: GenerationTask,
    failures: &mut Vec<TaskFailure>,
) -> Option<usize> {
    match outcome {
        Ok(count) => count,
        Err(error) => {
            failures.push(TaskFailure {
                task,
                error: Box::new(error),
            });
            None
        }
    }
}
