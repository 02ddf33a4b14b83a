//! Session Manager for dashboard session lifecycle management

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::market_data::{MarketDataSource, MarketStatistics, RestClient, StatisticsClient};
use crate::ui::ui_manager::UIManager;

use super::interaction::InteractionTracker;
use super::refresh_controller::{RefreshController, RefreshHandle};

/// Session state tracking
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Starting,
    Running,
    ShuttingDown,
    Terminated,
}

/// Owns one dashboard session: refresh controller, interaction tracker
/// and the statistics lookup
pub struct SessionManager {
    /// Application configuration
    app_config: Config,
    /// CLI arguments
    cli: Cli,
    /// Session state
    state: SessionState,
    /// Pointer interaction signal shared with the UI
    tracker: InteractionTracker,
    /// Running refresh controller
    refresh: Option<RefreshHandle>,
    /// Statistics cards receiver
    statistics_rx: Option<watch::Receiver<MarketStatistics>>,
    /// Statistics lookup task
    statistics_task: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Create a new SessionManager
    pub fn new(cli: &Cli, app_config: Config) -> Result<Self> {
        info!("Creating new SessionManager");

        Ok(Self {
            app_config,
            cli: cli.clone(),
            state: SessionState::Starting,
            tracker: InteractionTracker::new(),
            refresh: None,
            statistics_rx: None,
            statistics_task: None,
        })
    }

    /// Start the session using the appropriate execution mode
    pub async fn start(&mut self) -> Result<()> {
        match self.cli.command() {
            Commands::Dashboard => {
                if self.cli.is_dry_run_mode() {
                    return self.run_dry_run_mode();
                }
                self.initialize().await?;
                self.run().await
            }
            Commands::Snapshot { limit, json } => self.run_snapshot(limit, json).await,
            Commands::Config { action } => Config::handle_command(&action, &self.cli.config_file),
        }
    }

    fn run_dry_run_mode(&mut self) -> Result<()> {
        info!("Running in dry-run mode - showing configuration");

        println!("Dry-run mode configuration:");
        println!("Config file: {}", self.cli.config_file);
        println!("Log level: {}", self.cli.effective_log_level(&self.app_config.log_level));
        self.app_config.display_summary()?;

        self.state = SessionState::Terminated;
        Ok(())
    }

    /// Mount the dashboard: start the refresh controller and the one-shot
    /// statistics lookup
    pub async fn initialize(&mut self) -> Result<()> {
        info!("Initializing dashboard session");

        let source = Arc::new(MarketDataSource::from_config(&self.app_config.providers));
        let controller =
            RefreshController::new(self.app_config.refresh_interval(), source, &self.tracker);
        self.refresh = Some(controller.start());

        self.spawn_statistics_lookup();

        self.state = SessionState::Running;
        info!("Session initialized successfully");
        Ok(())
    }

    fn spawn_statistics_lookup(&mut self) {
        let (tx, rx) = watch::channel(MarketStatistics::default());
        let client = StatisticsClient::new(
            RestClient::new(),
            self.app_config.providers.coingecko_url.clone(),
            std::time::Duration::from_secs(self.app_config.providers.primary_timeout_secs),
        );

        self.statistics_rx = Some(rx);
        self.statistics_task = Some(tokio::spawn(async move {
            let stats = client.fetch().await;
            if tx.send(stats).is_err() {
                debug!("Statistics resolved after the dashboard closed");
            }
        }));
    }

    /// Run the terminal dashboard until the user quits
    pub async fn run(&mut self) -> Result<()> {
        let Some(refresh) = self.refresh.as_ref() else {
            anyhow::bail!("Session must be initialized before running");
        };

        let statistics_rx = self
            .statistics_rx
            .clone()
            .unwrap_or_else(|| watch::channel(MarketStatistics::default()).1);

        let mut ui_manager = UIManager::new(
            self.app_config.clone(),
            refresh.subscribe(),
            refresh.commander(),
            statistics_rx,
            self.tracker.clone(),
        );

        let result = ui_manager.run().await;
        self.shutdown().await?;
        result
    }

    /// Fetch once and print the result
    async fn run_snapshot(&mut self, limit: usize, json: bool) -> Result<()> {
        let source = MarketDataSource::from_config(&self.app_config.providers);
        let fetched = source.fetch().await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&fetched.coins)?);
        } else {
            crate::ui::cli::display_market_table(
                &fetched.coins,
                fetched.source,
                limit,
                self.app_config.ui.enable_colors,
            )?;
        }

        self.state = SessionState::Terminated;
        Ok(())
    }

    /// Unmount: stop the timer and detach late results
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == SessionState::Terminated {
            return Ok(());
        }

        info!("Shutting down session");
        self.state = SessionState::ShuttingDown;

        if let Some(refresh) = self.refresh.take() {
            refresh.stop().await;
        }

        if let Some(task) = self.statistics_task.take() {
            task.abort();
        }

        if self.tracker.is_interacting() {
            warn!("Session closed while a pointer press was active");
        }

        self.state = SessionState::Terminated;
        info!("Session terminated");
        Ok(())
    }
}
