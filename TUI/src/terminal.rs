use std::io::{self, Write};

use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

/// Raw mode plus alternate screen, undone on drop.
///
/// Whatever fails after `enter` returns, the terminal is handed back in a
/// usable state.
pub struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
    restored: bool,
}

impl<W: Write> TerminalGuard<W> {
    pub fn enter(out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        Self::enter_screen(out, true)
    }

    fn enter_screen(out: W, raw_mode: bool) -> io::Result<Self> {
        // Built before the first write so a failed write still restores
        let mut guard = Self {
            out,
            raw_mode,
            restored: false,
        };
        execute!(guard.out, EnterAlternateScreen)?;
        Ok(guard)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        if self.raw_mode {
            disable_raw_mode()?;
        }
        execute!(self.out, LeaveAlternateScreen, Show)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
