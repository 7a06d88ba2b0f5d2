//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use md2web_core::{Md2Web, ProgressReporter, RunReport};
use md2web_shared::{Md2WebConfig, init_config, load_config, load_config_from};
use tracing::{debug, info, trace};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// md2web: generate page components and a route table from markdown.
#[derive(Parser)]
#[command(
    name = "md2web",
    version,
    about = "Generate Vue page components and a vue-router table from a markdown tree.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to md2web.toml in the working directory).
    #[arg(long, global = true, env = "MD2WEB_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Flags that override values from the config file.
#[derive(Args, Debug, Default)]
pub(crate) struct Overrides {
    /// Directory scanned for markdown sources.
    #[arg(long, global = true)]
    pub root_dir: Option<PathBuf>,

    /// Output path of the route table.
    #[arg(long, global = true, conflicts_with = "no_routes")]
    pub route_file: Option<PathBuf>,

    /// Skip route table generation.
    #[arg(long, global = true)]
    pub no_routes: bool,

    /// Output root for generated components.
    #[arg(long, global = true, conflicts_with = "no_components")]
    pub components_dir: Option<PathBuf>,

    /// Skip component generation.
    #[arg(long, global = true)]
    pub no_components: bool,

    /// Module prefix used by the route table's lazy imports.
    #[arg(long, global = true)]
    pub import_prefix: Option<String>,

    /// Pass raw HTML in markdown through instead of escaping it.
    #[arg(long, global = true)]
    pub allow_html: bool,
}

impl Overrides {
    fn apply(&self, config: &mut Md2WebConfig) {
        if let Some(root) = &self.root_dir {
            config.root_dir = root.clone();
        }
        if let Some(route_file) = &self.route_file {
            config.route_file_path = Some(route_file.clone());
        }
        if self.no_routes {
            config.route_file_path = None;
        }
        if let Some(dir) = &self.components_dir {
            config.components_dir = Some(dir.clone());
        }
        if self.no_components {
            config.components_dir = None;
        }
        if let Some(prefix) = &self.import_prefix {
            config.component_import_prefix = prefix.clone();
        }
        if self.allow_html {
            config.allow_html = true;
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline once.
    Build,

    /// Run the pipeline, then rebuild whenever a source under the root changes.
    Watch {
        /// Quiet period in milliseconds before a batch of changes triggers a rebuild.
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write md2web.toml with defaults into the working directory.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = ["md2web", "md2web_core", "md2web_discovery", "md2web_markdown", "md2web_shared"]
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let project_dir =
        std::env::current_dir().map_err(|e| eyre!("cannot determine working directory: {e}"))?;

    match &cli.command {
        Command::Build => cmd_build(&cli, &project_dir).await,
        Command::Watch { debounce_ms } => cmd_watch(&cli, &project_dir, *debounce_ms).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&project_dir),
            ConfigAction::Show => cmd_config_show(&cli, &project_dir),
        },
    }
}

/// Load the config file (explicit path or project default) and apply CLI overrides.
fn resolve_config(cli: &Cli, project_dir: &Path) -> Result<Md2WebConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config(project_dir)?,
    };
    cli.overrides.apply(&mut config);
    Ok(config)
}

async fn cmd_build(cli: &Cli, project_dir: &Path) -> Result<()> {
    let plugin = Md2Web::new(resolve_config(cli, project_dir)?, project_dir)?;

    let reporter = CliProgress::new();
    let report = plugin.build_start(&reporter).await?;

    print_summary(&report);
    Ok(())
}

async fn cmd_watch(cli: &Cli, project_dir: &Path, debounce_ms: Option<u64>) -> Result<()> {
    let config = resolve_config(cli, project_dir)?;
    let debounce = Duration::from_millis(debounce_ms.unwrap_or(config.watch.debounce_ms));
    let plugin = Md2Web::new(config, project_dir)?;

    {
        let reporter = CliProgress::new();
        let report = plugin.build_start(&reporter).await?;
        print_summary(&report);
    }

    println!(
        "  Watching {} (Ctrl-C to stop)",
        plugin.watch_root().display()
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    md2web_core::watch::watch(&plugin, debounce, &LogProgress, shutdown).await?;
    Ok(())
}

fn cmd_config_init(project_dir: &Path) -> Result<()> {
    let path = init_config(project_dir)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(cli: &Cli, project_dir: &Path) -> Result<()> {
    let config = resolve_config(cli, project_dir)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("  Sources:    {}", report.files);
    match &report.route_file {
        Some(path) => println!("  Routes:     {} -> {}", report.routes, path.display()),
        None => println!("  Routes:     skipped"),
    }
    match &report.components_dir {
        Some(dir) => println!("  Components: {} -> {}", report.components, dir.display()),
        None => println!("  Components: skipped"),
    }
    println!("  Time:       {:.2}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// Progress reporters
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn component_written(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Writing [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _report: &RunReport) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

/// Reporter for watch-mode rebuilds: everything goes to the log.
struct LogProgress;

impl ProgressReporter for LogProgress {
    fn phase(&self, name: &str) {
        debug!(phase = name, "rebuild phase");
    }

    fn component_written(&self, path: &Path, current: usize, total: usize) {
        trace!(path = %path.display(), current, total, "component written");
    }

    fn done(&self, report: &RunReport) {
        info!(
            files = report.files,
            routes = report.routes,
            components = report.components,
            elapsed_ms = report.elapsed.as_millis(),
            "rebuilt"
        );
    }
}
