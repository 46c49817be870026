//! Discord bot client setup and lifecycle management.

use super::VishnuHandler;
use crate::CommandRegistry;
use serenity::Client;
use serenity::all::ShardManager;
use std::sync::Arc;
use tracing::{info, instrument};
use vishnu_error::{PlatformError, PlatformErrorKind};

/// Discord bot client for Vishnu.
///
/// # Example
/// ```no_run
/// # async fn run(registry: std::sync::Arc<vishnu_social::CommandRegistry>) -> Result<(), vishnu_error::PlatformError> {
/// use vishnu_social::discord::VishnuBot;
///
/// let token = std::env::var("DISCORD_TOKEN").unwrap_or_default();
/// let mut bot = VishnuBot::new(&token, registry).await?;
/// bot.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct VishnuBot {
    client: Client,
}

impl VishnuBot {
    /// Build the serenity client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed or the client fails to initialize.
    #[instrument(skip(token, registry), fields(token_len = token.len()))]
    pub async fn new(token: &str, registry: Arc<CommandRegistry>) -> Result<Self, PlatformError> {
        info!("Initializing Vishnu Discord bot");

        let intents = VishnuHandler::intents();
        let client = Client::builder(token, intents)
            .event_handler(VishnuHandler::new(registry))
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        info!(?intents, "Serenity client built");
        Ok(Self { client })
    }

    /// Connect and serve events until the connection ends.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<(), PlatformError> {
        info!("Starting Discord bot");

        self.client.start().await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }

    /// Handle for shutting the shards down from another task.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }
}
