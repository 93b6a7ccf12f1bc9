//! Terminal lifetime: raw mode and the alternate screen for as long as a
//! [`Tui`] is alive, restored on drop and on panic.

use color_eyre::eyre::Result;
use ratatui::{DefaultTerminal, Frame};
use tracing::warn;

pub struct Tui {
    terminal: DefaultTerminal,
}

impl Tui {
    /// Switch the terminal into dashboard mode with a hidden cursor.
    pub fn enter() -> Result<Self> {
        let mut terminal = ratatui::try_init()?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(err) = ratatui::try_restore() {
            warn!(error = %err, "failed to restore terminal");
        }
    }
}

/// Error reports without the env-var section, and a panic hook that hands
/// the screen back before printing.
///
/// Runs before [`Tui::enter`] so a panic during startup is still readable.
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = ratatui::try_restore();
        panic_hook(info);
    }));
    Ok(())
}
