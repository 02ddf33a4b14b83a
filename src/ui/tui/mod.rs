//! Terminal User Interface implementation
//!
//! Provides the main TUI interface using ratatui.

mod input;
mod render;

use std::io::{Stdout, stdout};

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use super::AppState;
use crate::AppResult;
use crate::ui::ui_manager::RenderState;

pub use input::handle_key_event;
use render::render_root;

/// Actions generated from key handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    None,
    ApplyPendingUpdate,
    QuitRequested,
}

/// RAII helper controlling the terminal lifecycle
///
/// Mouse capture is the pointer listener: enabled here once, removed on
/// restore or drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl Tui {
    /// Create a new TUI terminal instance
    pub fn new() -> AppResult<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            restored: false,
        })
    }

    /// Render the application
    pub fn draw(&mut self, app: &AppState, render_state: &RenderState) -> AppResult<()> {
        self.terminal.draw(|frame| {
            render_root(frame, app, render_state);
        })?;
        Ok(())
    }

    /// Restore terminal to canonical mode
    pub fn restore(&mut self) -> AppResult<()> {
        if self.restored {
            return Ok(());
        }
        disable_raw_mode()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            DisableMouseCapture,
            cursor::Show,
            LeaveAlternateScreen
        )?;
        self.restored = true;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        // Attempt to restore the terminal; ignore errors because we are in Drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = execute!(
            stdout,
            DisableMouseCapture,
            cursor::Show,
            LeaveAlternateScreen
        );
    }
}
