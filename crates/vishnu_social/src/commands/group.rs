use super::{record_id, required};
use crate::presentation;
use crate::{BotCommand, CommandContext, CommandServices, Reply};
use async_trait::async_trait;
use tracing::{info, warn};
use vishnu_core::group::group_id_from_channel;
use vishnu_core::{GroupFilter, NewGroup};
use vishnu_error::{GroupError, GroupErrorKind, PlatformError, VishnuResult};

fn report_platform_failure(reply: &mut Reply, group_id: i32, err: PlatformError) {
    warn!(group_id, error = %err, "Guild update failed");
    reply.push(err.user_message());
}

/// `groupadd <start_date> <max_users> [notes...]`
///
/// Stores the group, then sets up its role and channels and posts an
/// announcement when an announcement channel is configured. The group stays
/// stored if the guild setup fails.
pub struct GroupAddCommand;

#[async_trait]
impl BotCommand for GroupAddCommand {
    fn name(&self) -> &'static str {
        "groupadd"
    }

    fn usage(&self) -> &'static str {
        "<YYYY-MM-DD> <max_users> [notes...]"
    }

    fn summary(&self) -> &'static str {
        "Schedule a session with its own role and channels"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let start_date = required(args, 0, self.name(), "start date")?;
        let max_users = required(args, 1, self.name(), "max users")?;
        let group = NewGroup::parse(
            ctx.store_guild_id(),
            ctx.caller(),
            start_date,
            max_users,
            &args[2..],
        )?;

        let group = services.store().create_group(group).await?;
        info!(group_id = group.id(), start = %group.start_date(), "Group created");

        let mut reply = Reply::text(presentation::group_created(&group));

        if let Err(e) = services.platform().provision_group(ctx, &group).await {
            report_platform_failure(&mut reply, *group.id(), e);
        }

        if let Some(channel) = services.config().announce_chan() {
            let announcement =
                presentation::group_announcement(&group, services.config().command_prefix());
            if let Err(e) = services.platform().announce(*channel, &announcement).await {
                report_platform_failure(&mut reply, *group.id(), e);
            }
        }

        Ok(reply)
    }
}

/// `grouplist [id=] [creator=]`
pub struct GroupListCommand;

#[async_trait]
impl BotCommand for GroupListCommand {
    fn name(&self) -> &'static str {
        "grouplist"
    }

    fn usage(&self) -> &'static str {
        "[id=<id>] [creator=<name>]"
    }

    fn summary(&self) -> &'static str {
        "List scheduled groups"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let filter = GroupFilter::parse(args)?;
        let groups = services
            .store()
            .list_groups(ctx.store_guild_id(), &filter)
            .await?;

        if groups.is_empty() {
            return Ok(Reply::text("No groups match."));
        }
        Ok(Reply::many(presentation::group_table(
            &groups,
            *services.config().table_page_rows(),
        )))
    }
}

/// `groupjoin <id>`
pub struct GroupJoinCommand;

#[async_trait]
impl BotCommand for GroupJoinCommand {
    fn name(&self) -> &'static str {
        "groupjoin"
    }

    fn usage(&self) -> &'static str {
        "<id>"
    }

    fn summary(&self) -> &'static str {
        "Take a slot in a group"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let id = record_id(args, self.name())?;
        let group = services
            .store()
            .join_group(ctx.store_guild_id(), id, ctx.caller())
            .await?;
        info!(group_id = id, capacity = %group.capacity(), "Group joined");

        let mut reply = Reply::text(presentation::group_joined(ctx.caller(), id));
        if let Err(e) = services.platform().grant_group_role(ctx, id).await {
            report_platform_failure(&mut reply, id, e);
        }
        Ok(reply)
    }
}

/// `groupclose`, run inside the group's text channel by its creator.
///
/// Deletes the record, then removes the group's role and channels. The
/// closure is also posted to the announcement channel, since the invoking
/// channel no longer exists afterwards.
pub struct GroupCloseCommand;

#[async_trait]
impl BotCommand for GroupCloseCommand {
    fn name(&self) -> &'static str {
        "groupclose"
    }

    fn usage(&self) -> &'static str {
        ""
    }

    fn summary(&self) -> &'static str {
        "Close the group whose channel this is"
    }

    // Runs in group channels
    fn respects_channel_whitelist(&self) -> bool {
        false
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        _args: &[String],
    ) -> VishnuResult<Reply> {
        let id = group_id_from_channel(ctx.channel_name()).ok_or_else(|| {
            GroupError::new(GroupErrorKind::NotGroupChannel(ctx.channel_name().clone()))
        })?;

        let group = services.store().get_group(ctx.store_guild_id(), id).await?;
        group.ensure_owner(ctx.caller())?;

        // A failed delete must leave the group channel in place
        services.store().delete_group(ctx.store_guild_id(), id).await?;
        info!(group_id = id, "Group closed");

        let closed = presentation::group_closed(id);
        let mut reply = Reply::text(closed.clone());
        if let Err(e) = services.platform().teardown_group(ctx, id).await {
            report_platform_failure(&mut reply, id, e);
        }

        if let Some(channel) = services.config().announce_chan() {
            if let Err(e) = services.platform().announce(*channel, &closed).await {
                report_platform_failure(&mut reply, id, e);
            }
        }

        Ok(reply)
    }
}
