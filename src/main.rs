//! Application entry point for guildkeeper.
//!
//! Initializes all components and starts the Discord bot.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use guildkeeper::bot::Bot;
use guildkeeper::bot::sink::SerenityMessageSink;
use guildkeeper::config::Config;
use guildkeeper::interaction::InteractionEngine;
use guildkeeper::logging::setup_logging;
use guildkeeper::service::Services;
use guildkeeper::task::interaction_sweeper::InteractionSweeper;
use log::debug;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let services = setup_services(&config).await?;
    let interactions = Arc::new(InteractionEngine::new());
    let bot = setup_bot(&config, services, interactions.clone(), init_start).await?;

    InteractionSweeper::new(
        interactions,
        Arc::new(SerenityMessageSink::new(bot.http.clone())),
        config.sweep_interval,
    )
    .start();

    run(init_start).await
}

fn load_config() -> Result<Arc<Config>> {
    let mut config = Config::new();
    config.load()?;
    setup_logging(&config)?;
    info!("Configuration loaded.");
    debug!("Enabled features: {:?}", config.features);
    Ok(Arc::new(config))
}

async fn setup_services(config: &Config) -> Result<Arc<Services>> {
    debug!("Setting up Services...");
    Ok(Arc::new(Services::new(&config.data_path).await?))
}

async fn setup_bot(
    config: &Arc<Config>,
    services: Arc<Services>,
    interactions: Arc<InteractionEngine>,
    init_start: Instant,
) -> Result<Bot> {
    info!("Starting bot...");
    let mut bot = Bot::new(config.clone(), services, interactions).await?;

    bot.start()?;
    info!(
        "Bot setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(bot)
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "guildkeeper is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
