//! Command Line Interface module
//!
//! Implements the CLI commands and argument parsing for CoinPulse.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "coinpulse")]
#[command(about = "CoinPulse live crypto market dashboard")]
#[command(long_about = "A terminal dashboard that polls public cryptocurrency market data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(long, default_value = "config.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Dry-run mode: show configuration without starting the dashboard
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive terminal dashboard
    #[command(hide = true)]
    Dashboard,

    /// Fetch market data once and print it
    Snapshot {
        /// Maximum number of coins to print
        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Dashboard
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration file to defaults
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the actual command, using default if none provided
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// Check if we're running the interactive dashboard
    pub fn is_dashboard_mode(&self) -> bool {
        matches!(self.command(), Commands::Dashboard)
    }

    /// Resolve the log level: `--verbose`, then `--log-level`, then the
    /// configured level
    pub fn effective_log_level(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level
                .clone()
                .unwrap_or_else(|| configured.to_string())
        }
    }

    /// Check if we're running in dry-run mode
    pub fn is_dry_run_mode(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_dashboard() {
        let cli = Cli::parse_from(["coinpulse"]);
        assert!(cli.is_dashboard_mode());
        assert_eq!(cli.config_file, "config.toml");
    }

    #[test]
    fn test_snapshot_arguments() {
        let cli = Cli::parse_from(["coinpulse", "snapshot", "--limit", "5", "--json"]);
        match cli.command() {
            Commands::Snapshot { limit, json } => {
                assert_eq!(limit, 5);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_verbose_overrides_log_level() {
        let cli = Cli::parse_from(["coinpulse", "--log-level", "warn", "-v"]);
        assert_eq!(cli.effective_log_level("error"), "debug");
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["coinpulse"]);
        assert_eq!(cli.log_level, None);
        assert_eq!(cli.effective_log_level("warn"), "warn");

        let cli = Cli::parse_from(["coinpulse", "--log-level", "trace"]);
        assert_eq!(cli.effective_log_level("warn"), "trace");
    }
}
