mod bot;
mod config;
mod link;
mod metadata;
mod platform;
mod reply;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::requests::Requester;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Router;
use crate::config::Config;
use crate::metadata::MetadataFetcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tg_music=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Optional settings file; the token always comes from the environment
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Fetch timeout: {}s", config.fetch.timeout_secs);
    info!("  User agent: {}", config.fetch.user_agent);

    let fetcher =
        MetadataFetcher::new(&config.fetch).context("Failed to create HTTP client")?;
    let bot = teloxide::Bot::new(&config.bot_token);
    let me = bot.get_me().await.context("Failed to fetch bot identity")?;
    info!("  Bot username: @{}", me.username());

    let router = Arc::new(Router::new(fetcher).with_username(me.username()));

    info!("Bot is starting...");
    platform::telegram::run(router, bot).await?;

    Ok(())
}
