//! Terminal mode switching.
//!
//! While the composer runs, the terminal is in raw mode on the alternate
//! screen with the hardware cursor hidden. Bracketed paste and focus
//! reporting are on so a paste arrives as one event. [`TerminalGuard`]
//! restores everything on drop, including during a panic unwind.

use anyhow::{Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use std::io::stdout;
use tracing::{info, warn};

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Columns and rows.
    fn size(&self) -> Result<(u16, u16)>;
}

#[derive(Debug, Default)]
pub struct CrosstermBackend {
    raw: bool,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard(self))
    }

    pub fn is_entered(&self) -> bool {
        self.raw
    }

    fn restore(&mut self, from: &'static str) {
        if let Err(err) = self.leave() {
            warn!(target: "render.terminal", from, error = %err, "terminal_restore_failed");
        }
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if self.raw {
            return Ok(());
        }
        terminal::enable_raw_mode().context("enabling raw mode")?;
        self.raw = true;
        execute!(
            stdout(),
            EnterAlternateScreen,
            Hide,
            EnableBracketedPaste,
            EnableFocusChange
        )
        .context("switching to the alternate screen")?;
        info!(target: "render.terminal", "terminal_entered");
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        let screen = execute!(
            stdout(),
            DisableFocusChange,
            DisableBracketedPaste,
            LeaveAlternateScreen,
            Show
        );
        // Raw mode goes even if the screen could not be switched back.
        let raw = terminal::disable_raw_mode();
        screen.context("leaving the alternate screen")?;
        raw.context("disabling raw mode")?;
        info!(target: "render.terminal", "terminal_left");
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        terminal::size().context("querying terminal size")
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        self.restore("backend_drop");
    }
}

/// Leaves the terminal modes set by [`CrosstermBackend::enter_guard`].
pub struct TerminalGuard<'a>(&'a mut CrosstermBackend);

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        self.0.restore("guard_drop");
    }
}
