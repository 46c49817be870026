use super::{record_id, required};
use crate::presentation;
use crate::{BotCommand, CommandContext, CommandServices, Reply};
use async_trait::async_trait;
use tracing::info;
use vishnu_core::{NewQuest, QuestFilter};
use vishnu_error::VishnuResult;

/// `questadd <tier> <description...>`
pub struct QuestAddCommand;

#[async_trait]
impl BotCommand for QuestAddCommand {
    fn name(&self) -> &'static str {
        "questadd"
    }

    fn usage(&self) -> &'static str {
        "<tier> <description...>"
    }

    fn summary(&self) -> &'static str {
        "Post a quest to the board"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let tier = required(args, 0, self.name(), "tier")?;
        let quest = NewQuest::validate(
            ctx.store_guild_id(),
            tier,
            &args[1..],
            ctx.caller(),
            services.config().quest_tiers(),
        )?;

        let quest = services.store().create_quest(quest).await?;
        info!(quest_id = quest.id(), tier = %quest.tier(), "Quest added");
        Ok(Reply::text(presentation::quest_added(&quest)))
    }
}

/// `questdel <id>`
pub struct QuestDelCommand;

#[async_trait]
impl BotCommand for QuestDelCommand {
    fn name(&self) -> &'static str {
        "questdel"
    }

    fn usage(&self) -> &'static str {
        "<id>"
    }

    fn summary(&self) -> &'static str {
        "Remove a quest"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let id = record_id(args, self.name())?;
        services.store().delete_quest(ctx.store_guild_id(), id).await?;
        info!(quest_id = id, "Quest deleted");
        Ok(Reply::text(presentation::quest_deleted(id)))
    }
}

/// `questcomplete <id>` and `questuncomplete <id>`.
///
/// Both are idempotent.
pub struct QuestCompletionCommand {
    completed: bool,
}

impl QuestCompletionCommand {
    /// The `questcomplete` command.
    pub fn complete() -> Self {
        Self { completed: true }
    }

    /// The `questuncomplete` command.
    pub fn uncomplete() -> Self {
        Self { completed: false }
    }
}

#[async_trait]
impl BotCommand for QuestCompletionCommand {
    fn name(&self) -> &'static str {
        if self.completed {
            "questcomplete"
        } else {
            "questuncomplete"
        }
    }

    fn usage(&self) -> &'static str {
        "<id>"
    }

    fn summary(&self) -> &'static str {
        if self.completed {
            "Mark a quest as complete"
        } else {
            "Put a completed quest back on the board"
        }
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let id = record_id(args, self.name())?;
        let quest = services
            .store()
            .set_quest_completed(ctx.store_guild_id(), id, self.completed)
            .await?;
        info!(quest_id = id, completed = self.completed, "Quest updated");
        Ok(Reply::text(presentation::quest_completion(&quest)))
    }
}

/// `questlist [id=] [tier=] [creator=]`: open quests only.
pub struct QuestListCommand;

#[async_trait]
impl BotCommand for QuestListCommand {
    fn name(&self) -> &'static str {
        "questlist"
    }

    fn usage(&self) -> &'static str {
        "[id=<id>] [tier=<tier>] [creator=<name>]"
    }

    fn summary(&self) -> &'static str {
        "List open quests"
    }

    async fn execute(
        &self,
        services: &CommandServices,
        ctx: &CommandContext,
        args: &[String],
    ) -> VishnuResult<Reply> {
        let filter = QuestFilter::parse(args)?;
        let quests = services
            .store()
            .list_quests(ctx.store_guild_id(), &filter)
            .await?;

        if quests.is_empty() {
            return Ok(Reply::text("No open quests match."));
        }
        Ok(Reply::many(presentation::quest_table(
            &quests,
            *services.config().table_page_rows(),
        )))
    }
}
