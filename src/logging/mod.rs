pub mod config;
pub mod layers;

pub use layers::console::ConsoleOutput;

use crate::cli::{Args, Command};
use crate::core::config::ConfigLoader;
use crate::logging::config::LoggingConfig;
use crate::logging::layers::{console, file};
use crate::Result;
use anyhow::{anyhow, Context};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Keeps the file sink's background writer alive for the duration of the command.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize the logging framework for the parsed CLI arguments.
///
/// `RUST_LOG` takes precedence over the configured level. The `[logging]` section is
/// read from the same file the patch configuration comes from. Errors when invoked
/// more than once per process.
pub fn init(args: &Args) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let config_file = resolve_config_file(&args.command);
    let config = LoggingConfig::load(config_file.as_deref(), args.verbose)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .context("failed to configure tracing level")?;
    let log_file_path = config.log_dir.as_deref().map(file::log_file_path);

    type BaseRegistry = Registry;
    type FileSubscriber = file::FileLayerStack<BaseRegistry>;

    let (file_layer, file_guard) = file::file_layer::<BaseRegistry>(log_file_path.as_deref())?;
    let console_layer = console::console_layer::<FileSubscriber>(config.console_output);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    let file_sink = log_file_path
        .as_deref()
        .map_or_else(|| "disabled".to_string(), |path| path.display().to_string());
    tracing::debug!(
        level = %config.default_level,
        console = %config.console_output,
        file = %file_sink,
        "logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn resolve_config_file(command: &Command) -> Option<PathBuf> {
    let corpus = match command {
        Command::Patch(args) => &args.corpus,
        Command::Check(args) => &args.corpus,
        Command::ValidateContract(_) => return None,
    };
    Some(
        corpus
            .config
            .clone()
            .unwrap_or_else(|| ConfigLoader::default_path(&corpus.dir)),
    )
}
