//! Command routing.

use crate::commands;
use crate::{CommandContext, GuildPlatform, Reply};
use async_trait::async_trait;
use derive_getters::Getters;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use vishnu_core::{BotConfig, DiceRoller};
use vishnu_database::RecordStore;
use vishnu_error::{ParseError, ParseErrorKind, VishnuError, VishnuErrorKind, VishnuResult};
use vishnu_security::{PermissionChecker, PermissionConfig};

const HELP_COMMAND: &str = "help";

/// Everything a command handler may use.
#[derive(Getters)]
pub struct CommandServices {
    store: Arc<dyn RecordStore>,
    platform: Arc<dyn GuildPlatform>,
    config: Arc<BotConfig>,
    permissions: PermissionChecker,
    roller: DiceRoller,
}

impl CommandServices {
    /// Services with permissions derived from `config` and an entropy-seeded roller.
    pub fn new(
        store: Arc<dyn RecordStore>,
        platform: Arc<dyn GuildPlatform>,
        config: Arc<BotConfig>,
    ) -> Self {
        let permissions = PermissionChecker::new(PermissionConfig::from(config.as_ref()));
        let roller = DiceRoller::from_entropy(*config.max_dice());
        Self {
            store,
            platform,
            config,
            permissions,
            roller,
        }
    }

    /// Replace the dice roller.
    pub fn with_roller(mut self, roller: DiceRoller) -> Self {
        self.roller = roller;
        self
    }

    /// Replace the permission checker.
    pub fn with_permissions(mut self, permissions: PermissionChecker) -> Self {
        self.permissions = permissions;
        self
    }
}

/// A chat command.
#[async_trait]
pub trait BotCommand: Send + Sync {
    /// Name typed after the prefix.
    fn name(&self) -> &'static str;

    /// Argument synopsis shown by `help`.
    fn usage(&self) -> &'static str;

    /// One-line description shown by `help`.
    fn summary(&self) -> &'static str;

    /// Whether the channel whitelist applies to this command.
    fn respects_channel_whitelist(&self) -> bool {
        true
    }

    /// Run the command.
    ///
    /// Errors are turned into a reply by the registry.
    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply>;
}

/// Routes prefixed messages to commands.
pub struct CommandRegistry {
    services: Arc<CommandServices>,
    commands: BTreeMap<&'static str, Arc<dyn BotCommand>>,
}

impl CommandRegistry {
    /// Create a registry with no commands.
    pub fn new(services: Arc<CommandServices>) -> Self {
        debug!("Creating new CommandRegistry");
        Self {
            services,
            commands: BTreeMap::new(),
        }
    }

    /// Create a registry with the dice, quest and group commands.
    pub fn with_default_commands(services: Arc<CommandServices>) -> Self {
        let mut registry = Self::new(services);
        registry
            .register(commands::RollCommand)
            .register(commands::QuestAddCommand)
            .register(commands::QuestDelCommand)
            .register(commands::QuestCompletionCommand::complete())
            .register(commands::QuestCompletionCommand::uncomplete())
            .register(commands::QuestListCommand)
            .register(commands::GroupAddCommand)
            .register(commands::GroupListCommand)
            .register(commands::GroupJoinCommand)
            .register(commands::GroupCloseCommand);
        registry
    }

    /// Register a command, replacing any command with the same name.
    pub fn register<C: BotCommand + 'static>(&mut self, command: C) -> &mut Self {
        debug!(command = command.name(), "Registering command");
        self.commands.insert(command.name(), Arc::new(command));
        self
    }

    /// Services shared by every command.
    pub fn services(&self) -> &Arc<CommandServices> {
        &self.services
    }

    /// Names of the registered commands, sorted.
    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.keys().copied().collect()
    }

    /// Usage text for every command.
    pub fn help(&self) -> String {
        let prefix = self.services.config().command_prefix();
        let mut lines = vec!["Commands:".to_string()];
        for command in self.commands.values() {
            let usage = if command.usage().is_empty() {
                format!("{}{}", prefix, command.name())
            } else {
                format!("{}{} {}", prefix, command.name(), command.usage())
            };
            lines.push(format!("`{}` - {}", usage, command.summary()));
        }
        lines.push(format!("`{}{}` - Show this list", prefix, HELP_COMMAND));
        lines.join("\n")
    }

    /// Handle one chat message.
    ///
    /// Returns `None` when the message is not for the bot: no prefix, no
    /// command name, or a channel outside the whitelist. Every command
    /// error becomes a reply.
    #[instrument(
        skip(self, ctx, content),
        fields(guild = ctx.guild_id(), channel = ctx.channel_id(), caller = %ctx.caller())
    )]
    pub async fn dispatch(&self, ctx: &CommandContext, content: &str) -> Option<Reply> {
        let body = content.strip_prefix(self.services.config().command_prefix().as_str())?;
        let mut tokens = body.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let command = self.commands.get(name.as_str());
        let whitelisted = command.is_none_or(|c| c.respects_channel_whitelist());
        if whitelisted && !self.services.permissions().channel_allowed(*ctx.channel_id()) {
            debug!(command = %name, "Ignoring command outside whitelisted channels");
            return None;
        }

        let result = match command {
            Some(command) => self.run(command.as_ref(), ctx, &args).await,
            None if name == HELP_COMMAND => Ok(Reply::text(self.help())),
            None => Err(ParseError::new(ParseErrorKind::UnknownCommand(name.clone())).into()),
        };

        Some(match result {
            Ok(reply) => reply,
            Err(e) => {
                log_failure(&name, &e);
                Reply::text(e.user_message())
            }
        })
    }

    #[instrument(skip(self, command, ctx, args), fields(command = command.name(), args = args.len()))]
    async fn run(
        &self,
        command: &dyn BotCommand,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        self.services
            .permissions()
            .check_command(command.name(), ctx.caller_roles())?;

        let reply = command.execute(&self.services, ctx, args).await?;
        info!(messages = reply.messages().len(), "Command completed");
        Ok(reply)
    }
}

fn log_failure(command: &str, err: &VishnuError) {
    match err.kind() {
        VishnuErrorKind::Database(_) | VishnuErrorKind::Config(_) | VishnuErrorKind::Platform(_) => {
            error!(command, error = %err, "Command failed")
        }
        VishnuErrorKind::Security(_) => warn!(command, error = %err, "Command rejected"),
        _ => debug!(command, error = %err, "Command refused"),
    }
}
