use anyhow::{Context, Result};
use retrofeed::config::{DEFAULT_CONFIG_PATH, RetroConfig};
use retrofeed::display::Terminal;
use retrofeed::feed::FeedRegistry;
use retrofeed::logging::{LOG_PREFIX, init_logging};
use retrofeed::module::http_sources;
use retrofeed::sequencer::Sequencer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = RetroConfig::from_file(&config_path)?;

    let _logging_guard = init_logging(&config.logging.dir, LOG_PREFIX, &config.logging.level)?;

    tracing::info!("Retrofeed starting...");
    tracing::info!("Loaded configuration from {}", config_path);

    let sources = http_sources()?;
    let registry = FeedRegistry::with_builtin_feeds();
    let mut sequencer = Sequencer::build(&config, &registry, &sources).inspect_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
    })?;

    let mut terminal = Terminal::stdout();
    let err = match sequencer.run(&mut terminal).await {
        Err(err) => err,
        Ok(never) => match never {},
    };
    tracing::error!("Display loop stopped: {}", err);
    Err(err).context("Retrofeed stopped")
}
