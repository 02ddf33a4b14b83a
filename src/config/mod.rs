//! Configuration management module
//!
//! Handles loading, validation, and management of application configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Seconds between market data refresh cycles
    pub refresh_interval_secs: u64,

    /// Logging level
    pub log_level: String,

    /// File-based logging configuration
    pub log: LogConfig,

    /// Market data provider configuration
    pub providers: ProvidersConfig,

    /// UI-specific configuration
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// CoinGecko base URL (primary provider and statistics)
    pub coingecko_url: String,

    /// CoinCap base URL (secondary provider)
    pub coincap_url: String,

    /// Primary request timeout in seconds
    pub primary_timeout_secs: u64,

    /// Secondary request timeout in seconds
    pub secondary_timeout_secs: u64,

    /// Number of markets requested from the primary provider
    pub primary_page_size: u32,

    /// Number of assets requested from the secondary provider
    pub secondary_limit: u32,

    /// Fall back to synthetic sample data when live providers fail
    pub enable_sample_fallback: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable colors in CLI output
    pub enable_colors: bool,

    /// TUI update rate in FPS
    pub update_rate_fps: u32,

    /// Initial coin table page size
    pub rows_per_page: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Absolute or relative path to the log file
    pub file_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            log_level: "info".to_string(),
            log: LogConfig::default(),
            providers: ProvidersConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            coingecko_url: "https://api.coingecko.com".to_string(),
            coincap_url: "https://api.coincap.io".to_string(),
            primary_timeout_secs: 15,
            secondary_timeout_secs: 10,
            primary_page_size: 250,
            secondary_limit: 20,
            enable_sample_fallback: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enable_colors: true,
            update_rate_fps: 20,
            rows_per_page: 5,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: "logs/coinpulse.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment variable overrides
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_from_file_with(path, env_lookup)
    }

    fn load_from_file_with<P, F>(path: P, lookup: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.apply_overrides(lookup);

        config.validate()?;
        Ok(config)
    }

    /// Apply `COINPULSE_*` overrides resolved through `lookup`
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // COINPULSE_REFRESH_INTERVAL_SECS - refresh cadence
        if let Some(interval) = lookup("COINPULSE_REFRESH_INTERVAL_SECS") {
            if let Ok(value) = interval.parse::<u64>() {
                self.refresh_interval_secs = value;
            }
        }

        // COINPULSE_LOG_LEVEL - logging level
        if let Some(log_level) = lookup("COINPULSE_LOG_LEVEL") {
            self.log_level = log_level;
        }

        // COINPULSE_LOG_FILE_PATH - logging destination file
        if let Some(file_path) = lookup("COINPULSE_LOG_FILE_PATH") {
            if !file_path.trim().is_empty() {
                self.log.file_path = file_path;
            }
        }

        // COINPULSE_COINGECKO_URL - primary provider base URL
        if let Some(url) = lookup("COINPULSE_COINGECKO_URL") {
            self.providers.coingecko_url = url;
        }

        // COINPULSE_COINCAP_URL - secondary provider base URL
        if let Some(url) = lookup("COINPULSE_COINCAP_URL") {
            self.providers.coincap_url = url;
        }

        // COINPULSE_PRIMARY_TIMEOUT_SECS
        if let Some(timeout) = lookup("COINPULSE_PRIMARY_TIMEOUT_SECS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.providers.primary_timeout_secs = value;
            }
        }

        // COINPULSE_SECONDARY_TIMEOUT_SECS
        if let Some(timeout) = lookup("COINPULSE_SECONDARY_TIMEOUT_SECS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.providers.secondary_timeout_secs = value;
            }
        }

        // COINPULSE_ENABLE_SAMPLE_FALLBACK
        if let Some(enabled) = lookup("COINPULSE_ENABLE_SAMPLE_FALLBACK") {
            self.providers.enable_sample_fallback = enabled
                .parse()
                .unwrap_or(self.providers.enable_sample_fallback);
        }

        // COINPULSE_UI_ENABLE_COLORS
        if let Some(enable_colors) = lookup("COINPULSE_UI_ENABLE_COLORS") {
            self.ui.enable_colors = enable_colors.parse().unwrap_or(self.ui.enable_colors);
        }

        // COINPULSE_UI_UPDATE_RATE_FPS
        if let Some(fps) = lookup("COINPULSE_UI_UPDATE_RATE_FPS") {
            if let Ok(value) = fps.parse::<u32>() {
                self.ui.update_rate_fps = value;
            }
        }

        // COINPULSE_UI_ROWS_PER_PAGE
        if let Some(rows) = lookup("COINPULSE_UI_ROWS_PER_PAGE") {
            if let Ok(value) = rows.parse::<usize>() {
                self.ui.rows_per_page = value;
            }
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Load configuration with fallback to default
    ///
    /// The fallback still honours valid `COINPULSE_*` overrides; if those
    /// fail validation too, plain defaults are used. The returned error
    /// explains why the file was not used, for the caller to log once
    /// logging is up.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> (Self, Option<anyhow::Error>) {
        Self::load_or_default_with(path, env_lookup)
    }

    fn load_or_default_with<P, F>(path: P, lookup: F) -> (Self, Option<anyhow::Error>)
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let load_error = match Self::load_from_file_with(&path, &lookup) {
            Ok(config) => return (config, None),
            Err(err) => err,
        };

        let mut config = Self::default();
        config.apply_overrides(&lookup);

        match config.validate() {
            Ok(()) => (
                config,
                Some(load_error.context("Failed to load config, using defaults")),
            ),
            Err(invalid) => (
                Self::default(),
                Some(invalid.context(format!(
                    "Failed to load config ({:#}) and ignoring invalid COINPULSE_* overrides",
                    load_error
                ))),
            ),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            anyhow::bail!("Refresh interval must be greater than 0");
        }

        if self.log.file_path.trim().is_empty() {
            anyhow::bail!("Log file path must not be empty");
        }

        if self.providers.coingecko_url.trim().is_empty()
            || self.providers.coincap_url.trim().is_empty()
        {
            anyhow::bail!("Provider URLs must not be empty");
        }

        if self.providers.primary_timeout_secs == 0 || self.providers.secondary_timeout_secs == 0 {
            anyhow::bail!("Provider timeouts must be greater than 0");
        }

        if self.providers.primary_page_size == 0 || self.providers.secondary_limit == 0 {
            anyhow::bail!("Provider page sizes must be greater than 0");
        }

        if self.ui.update_rate_fps == 0 {
            anyhow::bail!("ui.update_rate_fps must be greater than 0");
        }

        if self.ui.rows_per_page == 0 {
            anyhow::bail!("ui.rows_per_page must be greater than 0");
        }

        Ok(())
    }

    /// Refresh cadence as a duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Display formatted configuration
    pub fn display(&self) -> Result<()> {
        println!("Current configuration:");
        println!(
            "{}",
            toml::to_string_pretty(self).context("Failed to serialize configuration")?
        );
        Ok(())
    }

    /// Display configuration summary
    pub fn display_summary(&self) -> Result<()> {
        println!(
            "Configuration loaded: refresh every {}s, providers {} -> {}{}",
            self.refresh_interval_secs,
            self.providers.coingecko_url,
            self.providers.coincap_url,
            if self.providers.enable_sample_fallback {
                " -> sample"
            } else {
                ""
            }
        );
        Ok(())
    }

    /// Display configuration management help
    pub fn display_help() -> Result<()> {
        println!("Configuration management commands:");
        println!("  coinpulse config show    - Show current configuration");
        println!("  coinpulse config reset   - Reset to default configuration");
        Ok(())
    }

    /// Handle configuration command
    pub fn handle_command<P: AsRef<Path>>(
        action: &Option<crate::cli::ConfigAction>,
        path: P,
    ) -> Result<()> {
        match action {
            Some(crate::cli::ConfigAction::Show) => {
                let (config, load_error) = Config::load_or_default(&path);
                if let Some(err) = load_error {
                    tracing::warn!("{:#}", err);
                }
                println!("Configuration from {}", path.as_ref().display());
                config.display()?;
            }
            Some(crate::cli::ConfigAction::Reset) => {
                let default_config = Config::default();
                default_config.save_to_file(&path)?;
                println!("Configuration reset: {}", path.as_ref().display());
                default_config.display()?;
            }
            None => {
                Config::display_help()?;
            }
        }
        Ok(())
    }
}

fn env_lookup(key: &str) -> Option<String> {
    env::var(key).ok()
}
