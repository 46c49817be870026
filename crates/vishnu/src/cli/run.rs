//! Bot startup and database maintenance.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};
use vishnu_core::BotConfig;
use vishnu_database::{PostgresStore, ResilientStore};
use vishnu_error::VishnuResult;
use vishnu_social::discord::{SerenityPlatform, VishnuBot};
use vishnu_social::{CommandRegistry, CommandServices};

#[instrument(skip(config))]
async fn open_store(config: &BotConfig) -> VishnuResult<PostgresStore> {
    let settings = config.store();
    let url = settings.resolve_database_url()?;
    let store = PostgresStore::connect(&url, settings)?;
    store.run_migrations().await?;
    Ok(store)
}

/// Load configuration, connect the store and serve Discord until shutdown.
///
/// Ctrl-C closes the gateway connection and returns.
#[instrument(skip(token))]
pub async fn run_bot(config_path: Option<&Path>, token: &str) -> VishnuResult<()> {
    let config = Arc::new(BotConfig::load(config_path)?);

    let store = ResilientStore::new(open_store(&config).await?, config.store());
    let platform = SerenityPlatform::from_token(token, *config.group_category());
    let services = CommandServices::new(Arc::new(store), Arc::new(platform), Arc::clone(&config));
    let registry = CommandRegistry::with_default_commands(Arc::new(services));
    info!(commands = ?registry.command_names(), "Commands registered");

    let mut bot = VishnuBot::new(token, Arc::new(registry)).await?;

    let shards = bot.shard_manager();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            shards.shutdown_all().await;
        }
    });

    bot.start().await?;
    info!("Bot stopped");
    Ok(())
}

/// Apply pending migrations and exit.
#[instrument]
pub async fn migrate(config_path: Option<&Path>) -> VishnuResult<()> {
    let config = BotConfig::load(config_path)?;
    open_store(&config).await?;
    info!("Database is up to date");
    Ok(())
}
