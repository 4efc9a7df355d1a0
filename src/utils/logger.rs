// Logger initialization

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "paper_finder=debug,tower_http=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Log to stderr, for the CLI and server modes.
pub fn init_logger() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Log to a daily rolling file so the terminal UI owns the screen.
///
/// The returned guard flushes pending lines when dropped. Fails when the
/// log directory cannot be created; no subscriber is installed then.
pub fn init_file_logger() -> Result<WorkerGuard, InitError> {
    let appender = file_appender(&log_dir())?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer))
        .init();

    Ok(guard)
}

fn file_appender(dir: &Path) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("paper-finder.log")
        .build(dir)
}

/// `<data dir>/paper-finder/logs`, or `./logs` when no data dir is known
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("paper-finder").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
