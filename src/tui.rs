//! Terminal setup and management
//!
//! Handles terminal initialization and restoration, with an RAII guard and
//! a panic hook so a crash never leaves the shell in raw mode.

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use curtain::errors::Result;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};

/// Type alias for our terminal backend
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize terminal for TUI mode
///
/// # Errors
/// Returns error if terminal setup fails (e.g., not a TTY).
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Restore terminal to normal state. Safe to call multiple times.
pub fn restore() -> Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Restore the terminal before the current panic hook prints
///
/// Call after `color_eyre::install()` so its report lands on a sane screen.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        previous(info);
    }));
}

/// RAII guard that restores terminal state on drop
///
/// ```ignore
/// let _guard = TerminalGuard;
/// // ... TUI code that might return early ...
/// ```
pub struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore();
    }
}
