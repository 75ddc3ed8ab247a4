// Raw mode and alternate screen for the lifetime of the UI.
// Every way out (normal exit, error, panic) puts the shell back as it was.
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, Stdout, Write};
use std::panic;
use tracing::warn;

pub type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

pub struct TerminalGuard {
    terminal: CrosstermTerminal,
    restored: bool,
}

impl TerminalGuard {
    // Enter raw mode and the alternate screen.
    // A failure halfway undoes whatever already succeeded.
    pub fn enter() -> io::Result<TerminalGuard> {
        enable_raw_mode()?;

        let setup = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .and_then(|_| Terminal::new(CrosstermBackend::new(io::stdout())));

        match setup {
            Ok(terminal) => Ok(TerminalGuard {
                terminal,
                restored: false,
            }),
            Err(err) => {
                if let Err(restore_err) = restore() {
                    warn!(error = %restore_err, "terminal restore after failed setup");
                }
                Err(err)
            }
        }
    }

    pub fn terminal_mut(&mut self) -> &mut CrosstermTerminal {
        &mut self.terminal
    }

    // Restore now and report how it went; dropping afterwards does nothing
    pub fn exit(mut self) -> io::Result<()> {
        self.restored = true;
        restore()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(err) = restore() {
                warn!(error = %err, "terminal restore on drop");
            }
        }
    }
}

// Restore the terminal before the default hook prints the panic message
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}

pub fn restore() -> io::Result<()> {
    restore_with(disable_raw_mode, &mut io::stdout())
}

// Runs every step even when an earlier one fails, returning the first error
fn restore_with<W: Write>(
    disable_raw: impl FnOnce() -> io::Result<()>,
    out: &mut W,
) -> io::Result<()> {
    let raw = disable_raw();
    let screen = execute!(out, LeaveAlternateScreen, DisableMouseCapture, Show);
    raw.and(screen)
}
