//! Record store interface.

use async_trait::async_trait;
use vishnu_core::{Group, GroupFilter, NewGroup, NewQuest, Quest, QuestFilter};
use vishnu_error::VishnuResult;

/// Quest persistence.
///
/// All operations are scoped to one guild.
#[async_trait]
pub trait QuestStore: Send + Sync {
    /// Store a validated quest and return it with its assigned id.
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest>;

    /// Open quests matching `filter`, ascending by id.
    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>>;

    /// Set (not toggle) the completed flag.
    ///
    /// # Errors
    ///
    /// `QuestErrorKind::NotFound` if no quest has this id in the guild.
    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest>;

    /// Remove a quest.
    ///
    /// # Errors
    ///
    /// `QuestErrorKind::NotFound` if no quest has this id in the guild.
    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()>;
}

/// Group persistence.
///
/// All operations are scoped to one guild.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Store a validated group and return it with its assigned id.
    async fn create_group(&self, group: NewGroup) -> VishnuResult<Group>;

    /// Fetch one group, or `GroupErrorKind::NotFound`.
    async fn get_group(&self, guild_id: i64, id: i32) -> VishnuResult<Group>;

    /// Groups matching `filter`, ascending by id.
    async fn list_groups(&self, guild_id: i64, filter: &GroupFilter) -> VishnuResult<Vec<Group>>;

    /// Add `member` to a group.
    ///
    /// Joins on the same group are serialized, so `filled` never exceeds
    /// `max` regardless of how many arrive at once.
    async fn join_group(&self, guild_id: i64, id: i32, member: &str) -> VishnuResult<Group>;

    /// Remove a group, or `GroupErrorKind::NotFound`.
    async fn delete_group(&self, guild_id: i64, id: i32) -> VishnuResult<()>;
}

/// A store for both record kinds.
pub trait RecordStore: QuestStore + GroupStore {}

impl<T: QuestStore + GroupStore> RecordStore for T {}
