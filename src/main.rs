mod app;
mod cli;
mod config;
mod dispatch;
mod error;
mod registry;
mod ui;
mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::{App, Outcome};
use cli::{Cli, Commands};
use config::{DEFAULT_CONFIG_FILE, SiteOptions, load_or_default_config, validate_config};
use dispatch::CommandDispatcher;
use registry::PluginRegistry;
use ui::Console;
use ui::palette::{configure_palette, detect_palette_kind_from_env};

fn main() -> ExitCode {
    // Keeps the log writer flushing until exit.
    let _guard = init_logging();

    match run(Cli::parse()) {
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("themes failed: {err:#}");
            let _ = ui::print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Logs go to a daily file so they never interleave with prompts.
fn init_logging() -> Option<WorkerGuard> {
    let log_dir = dirs::data_local_dir()
        .map(|d| d.join("themes").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".themes-logs"));
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "themes.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let filter =
        EnvFilter::try_from_env("THEMES_LOG").unwrap_or_else(|_| EnvFilter::new("themes=info"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init()
        .ok()?;
    Some(guard)
}

fn run(cli: Cli) -> Result<Outcome> {
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = load_or_default_config(&config_path);
    validate_config(&config)
        .with_context(|| format!("validating config {}", config_path.display()))?;

    let cache_dir = cli.cache_dir.unwrap_or_else(|| {
        dirs::cache_dir()
            .map(|d| d.join("themes"))
            .unwrap_or_else(|| PathBuf::from(".themes-cache"))
    });
    tracing::info!(
        plugins_dir = %config.plugins_dir.display(),
        cache_dir = %cache_dir.display(),
        "themes starting"
    );

    configure_palette(detect_palette_kind_from_env());

    let registry = PluginRegistry::new(config.plugins_dir.clone(), cache_dir);
    let dispatcher = CommandDispatcher::new(config.dispatch.clone());
    let options = SiteOptions::new(config.options_file.clone());
    let mut app = App::new(
        Console::stdio(),
        registry,
        dispatcher,
        options,
        cli::help_text(),
    );

    match cli.command {
        None => {
            app.run_menu()?;
            Ok(Outcome::Completed)
        }
        Some(Commands::Install {
            source,
            no_activate,
        }) => app.install(source.as_deref(), !no_activate),
        Some(Commands::Uninstall { theme }) => app.uninstall(theme.as_deref()),
        Some(Commands::Change { theme }) => app.change(theme.as_deref()),
        Some(Commands::List) => app.list(),
    }
}
