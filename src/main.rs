use coinpulse::{AppResult, cli::Cli, config::Config, init_logging, session::SessionManager};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Load configuration
    let (config, load_error) = Config::load_or_default(&cli.config_file);

    // Initialize logging
    let log_level = cli.effective_log_level(&config.log_level);
    let _log_guard = init_logging(&log_level, &config.log.file_path)?;

    if let Some(err) = load_error {
        tracing::warn!("{:#}", err);
    }

    tracing::info!("CoinPulse dashboard starting...");
    tracing::debug!("CLI arguments: {:?}", cli);

    // Create session manager
    let mut session_manager = SessionManager::new(&cli, config)?;

    // Run the selected command
    session_manager.start().await?;

    Ok(())
}
