//! UI Manager for interactive terminal interface

use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crossterm::event::{self, Event, MouseEventKind};

use crate::config::Config;
use crate::market_data::MarketStatistics;
use crate::session::{DashboardSnapshot, InteractionTracker, RefreshCommander};

use super::AppState;
use super::tui::{Tui, UiAction, handle_key_event};

/// UI Manager for managing the terminal interface
pub struct UIManager {
    /// Published refresh state
    snapshot_rx: watch::Receiver<DashboardSnapshot>,
    /// Statistics cards, filled once at start
    statistics_rx: watch::Receiver<MarketStatistics>,
    /// Apply-now command sender
    commander: RefreshCommander,
    /// Pointer interaction signal
    tracker: InteractionTracker,
    /// Application state
    app_state: AppState,
    /// UI rendering state
    render_state: RenderState,
    /// TUI terminal handle
    tui: Option<Tui>,
    /// Desired redraw cadence
    refresh_interval: Duration,
    /// Time of the last successful render
    last_render: Instant,
}

/// UI rendering state
#[derive(Debug, Clone)]
pub struct RenderState {
    pub should_quit: bool,
    pub should_redraw: bool,
    pub render_count: u64,
    pub error_message: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            should_quit: false,
            should_redraw: true,
            render_count: 0,
            error_message: None,
        }
    }
}

impl UIManager {
    pub fn new(
        config: Config,
        snapshot_rx: watch::Receiver<DashboardSnapshot>,
        commander: RefreshCommander,
        statistics_rx: watch::Receiver<MarketStatistics>,
        tracker: InteractionTracker,
    ) -> Self {
        let fps = config.ui.update_rate_fps.max(1) as u64;

        Self {
            snapshot_rx,
            statistics_rx,
            commander,
            tracker,
            app_state: AppState::new(config.ui.rows_per_page),
            render_state: RenderState::default(),
            tui: None,
            refresh_interval: Duration::from_millis(1000 / fps),
            last_render: Instant::now(),
        }
    }

    /// Run the UI manager until quit is requested
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting UI manager");

        self.tui =
            Some(Tui::new().map_err(|e| anyhow::anyhow!("Failed to initialise terminal: {}", e))?);

        let result = self.run_ui_loop().await;

        self.shutdown();
        info!("UI manager stopped");
        result
    }

    /// Main UI rendering loop
    async fn run_ui_loop(&mut self) -> Result<()> {
        info!("Starting UI rendering loop");

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        self.render_state.should_redraw = true;
        self.last_render = Instant::now()
            .checked_sub(self.refresh_interval)
            .unwrap_or_else(Instant::now);

        while !self.render_state.should_quit && !self.app_state.should_quit {
            // Pull the latest published state
            self.sync_snapshot();
            self.sync_statistics();

            // Handle terminal input (non-blocking)
            self.poll_terminal_events()?;

            // Render on dirty state or cadence tick
            let now = Instant::now();
            if self.render_state.should_redraw
                || now.duration_since(self.last_render) >= self.refresh_interval
            {
                if let Some(tui) = self.tui.as_mut() {
                    self.render_state.render_count += 1;
                    tui.draw(&self.app_state, &self.render_state)
                        .map_err(|e| anyhow::anyhow!("Failed to render frame: {}", e))?;
                }
                self.render_state.should_redraw = false;
                self.last_render = now;
            }

            // Prevent busy loop
            tokio::select! {
                signal = &mut ctrl_c => {
                    if let Err(e) = signal {
                        warn!("Failed to listen for Ctrl+C: {}", e);
                    }
                    info!("Ctrl+C received, initiating shutdown");
                    self.render_state.should_quit = true;
                }
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }
        }

        Ok(())
    }

    fn sync_snapshot(&mut self) {
        // Err means the controller has stopped; keep the last frame
        if self.snapshot_rx.has_changed().unwrap_or(false) {
            let snapshot = self.snapshot_rx.borrow_and_update().clone();
            self.app_state.apply_snapshot(snapshot);
            self.render_state.should_redraw = true;
        }
    }

    fn sync_statistics(&mut self) {
        if self.statistics_rx.has_changed().unwrap_or(false) {
            self.app_state.statistics = self.statistics_rx.borrow_and_update().clone();
            self.render_state.should_redraw = true;
        }
    }

    /// Poll for keyboard, mouse and terminal events
    fn poll_terminal_events(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key_event) => {
                    let action = handle_key_event(&mut self.app_state, key_event);
                    self.render_state.should_redraw = true;
                    self.handle_action(action);
                }
                Event::Mouse(mouse_event) => match mouse_event.kind {
                    MouseEventKind::Down(_) => {
                        self.tracker.on_pointer_down();
                        self.app_state.interacting = true;
                        self.render_state.should_redraw = true;
                    }
                    MouseEventKind::Up(_) => {
                        self.tracker.on_pointer_up();
                        self.app_state.interacting = false;
                        self.render_state.should_redraw = true;
                    }
                    _ => {}
                },
                Event::Resize(_, _) => {
                    self.render_state.should_redraw = true;
                }
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        if self.app_state.should_quit {
            self.render_state.should_quit = true;
        }

        Ok(())
    }

    fn handle_action(&mut self, action: UiAction) {
        match action {
            UiAction::None => {}
            UiAction::QuitRequested => {
                self.render_state.should_quit = true;
            }
            UiAction::ApplyPendingUpdate => {
                if !self.app_state.snapshot.pending_update_available {
                    debug!("Apply requested with no pending update");
                    return;
                }
                match self.commander.apply_pending_update() {
                    Ok(()) => self.render_state.error_message = None,
                    Err(e) => {
                        warn!("Failed to apply pending update: {}", e);
                        self.render_state.error_message = Some(e.to_string());
                    }
                }
            }
        }
    }

    /// Restore the terminal; mouse capture is released with it
    fn shutdown(&mut self) {
        info!("Shutting down UI manager");

        self.render_state.should_quit = true;
        self.app_state.should_quit = true;

        if let Some(mut tui) = self.tui.take() {
            if let Err(e) = tui.restore() {
                warn!("Failed to restore terminal during shutdown: {}", e);
            }
        }
    }
}
