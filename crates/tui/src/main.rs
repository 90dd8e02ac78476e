mod app;
mod events;
mod logging;
mod persist;
mod strings;
mod terminal;
mod theme;
mod ui;

use anyhow::Result;
use terminal::TerminalGuard;
use tracing::info;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    info!(target: "tui", "starting codemate-term {}", env!("CARGO_PKG_VERSION"));
    let mut app = app::App::new()?;
    let mut term = TerminalGuard::new()?;
    events::run(&mut term.terminal, &mut app)
}
