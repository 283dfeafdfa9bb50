use std::ops::{Deref, DerefMut};

use anyhow::{Context, Result};
use ratatui::DefaultTerminal;
use tracing::debug;

/// Raw-mode alternate screen for the lifetime of the guard.
///
/// `ratatui::try_init` installs a panic hook that restores the terminal, so
/// a panic inside the event loop still leaves the shell usable.
pub struct TerminalGuard {
    terminal: DefaultTerminal,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        let terminal = ratatui::try_init().context("failed to initialize terminal")?;
        debug!("entered alternate screen");
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        ratatui::restore();
        debug!("restored terminal");
    }
}

impl Deref for TerminalGuard {
    type Target = DefaultTerminal;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}
