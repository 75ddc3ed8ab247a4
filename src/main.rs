use clap::Parser;
use tracing::{error, info};

mod app;
mod cli;
mod logging;
mod terminal;

// Start the app.
// Terminal handling follows the ratatui list example:
// https://github.com/ratatui-org/ratatui/blob/main/examples/list.rs
pub fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    logging::init_tracing(cli.log_file.as_deref(), cli.default_log_level())?;

    terminal::install_panic_hook();
    let mut guard = terminal::TerminalGuard::enter()?;

    info!(tick_rate_ms = cli.tick_rate_ms, "session started");
    let res = app::ui::run_app(guard.terminal_mut(), app::ui::App::new(), cli.tick_rate());

    // Restore previous terminal state before anything is printed
    let restored = guard.exit();

    if let Err(err) = res {
        error!(error = %err, "session ended with an error");
        println!("{err:?}");
    }
    info!("session ended");

    restored?;
    Ok(())
}
