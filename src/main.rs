//! Claude Command Log - record every Bash command Claude Code runs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use claude_command_log::config::{ConfigError, ConfigLoader, MonitorConfig};
use claude_command_log::display;
use claude_command_log::monitor::CommandMonitor;
use claude_command_log::watcher::{resolve_watch_dirs, ChangeDispatcher, WatcherError};

#[derive(Parser)]
#[command(
    name = "claude-command-log",
    about = "Monitor Claude Code sessions and log every Bash command in real time",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only watch projects whose directory name contains NAME (e.g. "georgia").
    #[arg(short = 'p', long, value_name = "NAME")]
    project_filter: Option<String>,

    /// Command log path [default: ~/.claude_command_log.txt]
    #[arg(short = 'l', long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Claude Code projects directory [default: ~/.claude/projects]
    #[arg(long, value_name = "PATH")]
    projects_dir: Option<PathBuf>,

    /// Config file to load instead of the default search paths.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debounce window for file events, in milliseconds.
    #[arg(long, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Skip commands already present in session files at startup.
    #[arg(long)]
    skip_existing: bool,

    /// Tag written after the ### delimiter [default: CLAUDE]
    #[arg(long)]
    tag: Option<String>,
}

impl Cli {
    /// Layer command line flags over file configuration.
    fn apply(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(filter) = &self.project_filter {
            config.project_filter = Some(filter.clone());
        }
        if let Some(log_file) = &self.log_file {
            config.log_file.clone_from(log_file);
        }
        if let Some(dir) = &self.projects_dir {
            config.projects_dir.clone_from(dir);
        }
        if let Some(ms) = self.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(tag) = &self.tag {
            config.tag.clone_from(tag);
        }
        config.skip_existing |= self.skip_existing;
        config.expanded()
    }
}

/// Reasons the monitor refuses to start.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Could not determine home directory for {0}")]
    NoHome(PathBuf),

    #[error("Claude projects directory not found: {0}")]
    MissingProjectsDir(PathBuf),

    #[error("No project directories under {dir} match {filter:?}")]
    NoMatchingProjects { dir: PathBuf, filter: String },

    #[error(transparent)]
    Watcher(#[from] WatcherError),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> Result<MonitorConfig, StartupError> {
    let loader = cli
        .config
        .clone()
        .map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = cli.apply(loader.load()?);

    for path in [&config.projects_dir, &config.log_file] {
        if path.starts_with("~") {
            return Err(StartupError::NoHome(path.clone()));
        }
    }
    if !config.projects_dir.is_dir() {
        return Err(StartupError::MissingProjectsDir(config.projects_dir.clone()));
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = load_config(&cli)?;
    tracing::info!(
        projects_dir = %config.projects_dir.display(),
        log_file = %config.log_file.display(),
        filter = ?config.project_filter,
        "Starting command monitor"
    );

    let dirs = resolve_watch_dirs(&config.projects_dir, config.project_filter.as_deref())?;
    if dirs.is_empty() {
        return Err(StartupError::NoMatchingProjects {
            dir: config.projects_dir.clone(),
            filter: config.project_filter.clone().unwrap_or_default(),
        });
    }

    // Subscribe before scanning so nothing appended mid-scan is missed
    let (dispatcher, events) = ChangeDispatcher::start(dirs.clone(), config.debounce())?;
    for dir in dispatcher.dirs() {
        display::print_watching(dir);
    }

    let mut monitor = CommandMonitor::from_config(&config);

    display::print_scan_start();
    let scan = monitor.bootstrap(&dirs).await;
    display::print_scan_done(scan.files, scan.logged);

    display::print_monitoring_started(monitor.log().path());

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
        signal_cancel.cancel();
    });

    monitor.run(events, cancel).await;

    dispatcher.stop();
    display::print_monitoring_stopped();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Startup failed");
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
