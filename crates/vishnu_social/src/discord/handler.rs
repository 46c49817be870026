//! Serenity event handler for the Vishnu bot.

use crate::{CommandContext, CommandContextBuilder, CommandRegistry};
use serenity::all::{GuildId, Message, Ready};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::gateway::GatewayIntents;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Event handler that feeds guild messages to a [`CommandRegistry`].
pub struct VishnuHandler {
    registry: Arc<CommandRegistry>,
}

impl VishnuHandler {
    /// Create a handler dispatching to `registry`.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Names of the roles the author holds.
    ///
    /// A lookup failure yields no roles, so privileged commands are refused.
    async fn role_names(&self, ctx: &Context, guild_id: GuildId, msg: &Message) -> Vec<String> {
        let Some(member) = msg.member.as_ref() else {
            return Vec::new();
        };

        match guild_id.roles(&ctx.http).await {
            Ok(roles) => member
                .roles
                .iter()
                .filter_map(|id| roles.get(id).map(|role| role.name.clone()))
                .collect(),
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to fetch guild roles");
                Vec::new()
            }
        }
    }

    async fn channel_name(&self, ctx: &Context, msg: &Message) -> String {
        match msg.channel_id.to_channel(&ctx.http).await {
            Ok(channel) => channel.guild().map(|c| c.name).unwrap_or_default(),
            Err(e) => {
                warn!(channel_id = %msg.channel_id, error = %e, "Failed to fetch channel");
                String::new()
            }
        }
    }

    async fn command_context(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        msg: &Message,
    ) -> Option<CommandContext> {
        let channel_name = self.channel_name(ctx, msg).await;
        let roles = self.role_names(ctx, guild_id, msg).await;

        let built = CommandContextBuilder::default()
            .guild_id(guild_id.get())
            .channel_id(msg.channel_id.get())
            .channel_name(channel_name)
            .caller(msg.author.name.clone())
            .caller_id(msg.author.id.get())
            .caller_roles(roles)
            .build();

        match built {
            Ok(context) => Some(context),
            Err(e) => {
                error!(error = %e, "Failed to build command context");
                None
            }
        }
    }
}

#[async_trait]
impl EventHandler for VishnuHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_user = %ready.user.name,
            bot_id = %ready.user.id,
            guilds = ready.guilds.len(),
            "Bot connected to Discord"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        // Direct messages have no guild to scope records to
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let prefix = self.registry.services().config().command_prefix();
        if !msg.content.starts_with(prefix.as_str()) {
            return;
        }

        let Some(command_ctx) = self.command_context(&ctx, guild_id, &msg).await else {
            return;
        };

        let Some(reply) = self.registry.dispatch(&command_ctx, &msg.content).await else {
            return;
        };

        debug!(messages = reply.messages().len(), "Sending reply");
        for text in reply.messages() {
            if let Err(e) = msg.channel_id.say(&ctx.http, text).await {
                warn!(channel_id = %msg.channel_id, error = %e, "Failed to send reply");
            }
        }
    }
}
