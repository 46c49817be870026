//! Guild side effects over the Discord HTTP API.

use crate::{CommandContext, GuildPlatform};
use async_trait::async_trait;
use serenity::all::{
    ChannelId, ChannelType, CreateChannel, EditRole, GuildId, Http, PermissionOverwrite,
    PermissionOverwriteType, Permissions, RoleId, UserId,
};
use std::num::NonZeroU64;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use vishnu_core::Group;
use vishnu_core::group::{role_name, text_channel_name, voice_channel_name};
use vishnu_error::{PlatformError, PlatformErrorKind};

const CLOSE_REASON: &str = "Group has been closed.";

fn snowflake<T: From<NonZeroU64>>(raw: u64, what: &str) -> Result<T, PlatformError> {
    NonZeroU64::new(raw)
        .map(T::from)
        .ok_or_else(|| PlatformError::new(PlatformErrorKind::InvalidId(what.to_string())))
}

fn role_error(role: &str, err: serenity::Error) -> PlatformError {
    PlatformError::new(PlatformErrorKind::Role {
        role: role.to_string(),
        reason: err.to_string(),
    })
}

fn channel_error(channel: &str, err: serenity::Error) -> PlatformError {
    PlatformError::new(PlatformErrorKind::Channel {
        channel: channel.to_string(),
        reason: err.to_string(),
    })
}

/// [`GuildPlatform`] backed by serenity's HTTP client.
///
/// Group channels are private: `@everyone` is denied access and the group's
/// role is granted it.
pub struct SerenityPlatform {
    http: Arc<Http>,
    group_category: Option<u64>,
}

impl SerenityPlatform {
    /// Wrap an existing HTTP client.
    pub fn new(http: Arc<Http>, group_category: Option<u64>) -> Self {
        Self {
            http,
            group_category,
        }
    }

    /// Create an HTTP client for `token`.
    pub fn from_token(token: &str, group_category: Option<u64>) -> Self {
        Self::new(Arc::new(Http::new(token)), group_category)
    }

    async fn find_role(&self, guild: GuildId, name: &str) -> Result<Option<RoleId>, PlatformError> {
        let roles = guild
            .roles(&self.http)
            .await
            .map_err(|e| role_error(name, e))?;
        Ok(roles
            .into_iter()
            .find(|(_, role)| role.name == name)
            .map(|(id, _)| id))
    }

    async fn create_group_channel(
        &self,
        guild: GuildId,
        name: String,
        kind: ChannelType,
        role: RoleId,
        reason: &str,
    ) -> Result<(), PlatformError> {
        let access = match kind {
            ChannelType::Voice => Permissions::VIEW_CHANNEL | Permissions::CONNECT,
            _ => Permissions::VIEW_CHANNEL,
        };
        let overwrites = vec![
            PermissionOverwrite {
                allow: Permissions::empty(),
                deny: access,
                kind: PermissionOverwriteType::Role(guild.everyone_role()),
            },
            PermissionOverwrite {
                allow: access,
                deny: Permissions::empty(),
                kind: PermissionOverwriteType::Role(role),
            },
        ];

        let mut builder = CreateChannel::new(name.as_str())
            .kind(kind)
            .permissions(overwrites)
            .audit_log_reason(reason);
        if let Some(category) = self.group_category {
            builder = builder.category(snowflake::<ChannelId>(category, "category")?);
        }

        let channel = guild
            .create_channel(&self.http, builder)
            .await
            .map_err(|e| channel_error(&name, e))?;
        debug!(channel_id = %channel.id, name = %name, "Created group channel");
        Ok(())
    }
}

#[async_trait]
impl GuildPlatform for SerenityPlatform {
    #[instrument(skip(self, ctx, group), fields(group_id = group.id()))]
    async fn provision_group(
        &self,
        ctx: &CommandContext,
        group: &Group,
    ) -> Result<(), PlatformError> {
        let guild: GuildId = snowflake(*ctx.guild_id(), "guild")?;
        let user: UserId = snowflake(*ctx.caller_id(), "user")?;
        let name = role_name(*group.id());
        let reason = format!("Automated role creation, requested by {}", ctx.caller());

        let role = guild
            .create_role(
                &self.http,
                EditRole::new()
                    .name(name.as_str())
                    .mentionable(true)
                    .audit_log_reason(&reason),
            )
            .await
            .map_err(|e| role_error(&name, e))?;

        self.http
            .add_member_role(guild, user, role.id, Some(reason.as_str()))
            .await
            .map_err(|e| role_error(&name, e))?;

        self.create_group_channel(
            guild,
            text_channel_name(*group.id()),
            ChannelType::Text,
            role.id,
            &reason,
        )
        .await?;
        self.create_group_channel(
            guild,
            voice_channel_name(*group.id()),
            ChannelType::Voice,
            role.id,
            &reason,
        )
        .await?;

        info!(role_id = %role.id, "Provisioned group");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn grant_group_role(
        &self,
        ctx: &CommandContext,
        group_id: i32,
    ) -> Result<(), PlatformError> {
        let guild: GuildId = snowflake(*ctx.guild_id(), "guild")?;
        let user: UserId = snowflake(*ctx.caller_id(), "user")?;
        let name = role_name(group_id);

        let role = self.find_role(guild, &name).await?.ok_or_else(|| {
            PlatformError::new(PlatformErrorKind::Role {
                role: name.clone(),
                reason: "role does not exist".to_string(),
            })
        })?;

        self.http
            .add_member_role(guild, user, role, Some("Joined group"))
            .await
            .map_err(|e| role_error(&name, e))?;
        debug!(role_id = %role, "Granted group role");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn teardown_group(
        &self,
        ctx: &CommandContext,
        group_id: i32,
    ) -> Result<(), PlatformError> {
        let guild: GuildId = snowflake(*ctx.guild_id(), "guild")?;
        let wanted = [text_channel_name(group_id), voice_channel_name(group_id)];

        let channels = guild
            .channels(&self.http)
            .await
            .map_err(|e| channel_error(&wanted[0], e))?;
        for (id, channel) in channels {
            if wanted.contains(&channel.name) {
                self.http
                    .delete_channel(id, Some(CLOSE_REASON))
                    .await
                    .map_err(|e| channel_error(&channel.name, e))?;
                debug!(channel = %channel.name, "Deleted group channel");
            }
        }

        let name = role_name(group_id);
        if let Some(role) = self.find_role(guild, &name).await? {
            self.http
                .delete_role(guild, role, Some(CLOSE_REASON))
                .await
                .map_err(|e| role_error(&name, e))?;
            debug!(role = %name, "Deleted group role");
        }

        info!("Tore down group");
        Ok(())
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn announce(&self, channel_id: u64, text: &str) -> Result<(), PlatformError> {
        let channel: ChannelId = snowflake(channel_id, "channel")?;
        channel
            .say(&self.http, text)
            .await
            .map_err(|e| PlatformError::new(PlatformErrorKind::MessageSendFailed(e.to_string())))?;
        Ok(())
    }
}
