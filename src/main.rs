use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ticket_dashboard::bridge::BlockingBridge;
use ticket_dashboard::cli::Cli;
use ticket_dashboard::config::AppConfig;
use ticket_dashboard::store::{MemorySettingsStore, PgSettingsStore, SettingsStore};
use ticket_dashboard::{server, AppContext};

fn main() -> anyhow::Result<()> {
    // Load .env if present so DISCORD_* and DATABASE_URL are picked up locally.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    cli.apply(&mut config);
    tracing::info!("Starting ticket dashboard in {:?} mode", config.environment);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    // main stays synchronous; store set-up runs on the server's runtime.
    let bridge = BlockingBridge::Attached(runtime.handle().clone());
    let store = connect_store(&bridge, &config)?;

    let ctx = AppContext::from_config(config, store).context("failed to build HTTP client")?;
    runtime.block_on(server::serve(ctx)).context("server error")
}

fn connect_store(bridge: &BlockingBridge, config: &AppConfig) -> anyhow::Result<Arc<dyn SettingsStore>> {
    let Some(url) = config.database.url.clone() else {
        tracing::warn!("DATABASE_URL not set, guild settings are kept in memory");
        return Ok(Arc::new(MemorySettingsStore::new()));
    };

    let database = config.database.clone();
    let store = bridge
        .run(async move { PgSettingsStore::connect(&url, &database).await })?
        .context("failed to connect the settings store")?;
    Ok(Arc::new(store))
}
