//! File logging for the TUI. Stdout belongs to the terminal UI, so all
//! tracing output goes to `<data_dir>/codemate/logs/codemate-term.log`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FILE_NAME: &str = "codemate-term.log";

/// Installs the global subscriber. The returned guard must be held until exit
/// so buffered lines are flushed. Returns `None` if logging could not be set up.
pub fn init() -> Option<WorkerGuard> {
    let dir = crate::persist::data_dir()?.join("logs");
    init_in(&dir)
}

pub fn init_in(dir: &Path) -> Option<WorkerGuard> {
    std::fs::create_dir_all(dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .ok()?;
    Some(guard)
}
