//! In-memory record store.

use crate::store::{GroupStore, QuestStore};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use vishnu_core::{Group, GroupFilter, NewGroup, NewQuest, Quest, QuestFilter};
use vishnu_error::{GroupError, GroupErrorKind, QuestError, QuestErrorKind, VishnuResult};

#[derive(Debug, Default)]
struct Records {
    quests: BTreeMap<i32, Quest>,
    groups: BTreeMap<i32, Group>,
    last_quest_id: i32,
    last_group_id: i32,
}

/// Record store kept in process memory.
///
/// Every operation takes one async mutex, so mutations are serialized.
/// Ids are assigned from 1 upwards and never reused, like a serial column.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestStore for MemoryStore {
    #[instrument(skip(self, quest))]
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest> {
        let mut records = self.records.lock().await;
        records.last_quest_id += 1;
        let id = records.last_quest_id;

        let quest = quest.into_quest(id);
        records.quests.insert(id, quest.clone());
        debug!(id, "Quest stored");
        Ok(quest)
    }

    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>> {
        let records = self.records.lock().await;
        Ok(records
            .quests
            .values()
            .filter(|q| *q.guild_id() == guild_id && filter.matches(q))
            .cloned()
            .collect())
    }

    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest> {
        let mut records = self.records.lock().await;
        let quest = records
            .quests
            .get_mut(&id)
            .filter(|q| *q.guild_id() == guild_id)
            .ok_or_else(|| QuestError::new(QuestErrorKind::NotFound(id)))?;

        quest.set_completed(completed);
        Ok(quest.clone())
    }

    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        let mut records = self.records.lock().await;
        match records.quests.get(&id) {
            Some(q) if *q.guild_id() == guild_id => {
                records.quests.remove(&id);
                Ok(())
            }
            _ => Err(QuestError::new(QuestErrorKind::NotFound(id)).into()),
        }
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    #[instrument(skip(self, group))]
    async fn create_group(&self, group: NewGroup) -> VishnuResult<Group> {
        let mut records = self.records.lock().await;
        records.last_group_id += 1;
        let id = records.last_group_id;

        let group = group.into_group(id);
        records.groups.insert(id, group.clone());
        debug!(id, "Group stored");
        Ok(group)
    }

    async fn get_group(&self, guild_id: i64, id: i32) -> VishnuResult<Group> {
        let records = self.records.lock().await;
        records
            .groups
            .get(&id)
            .filter(|g| *g.guild_id() == guild_id)
            .cloned()
            .ok_or_else(|| GroupError::new(GroupErrorKind::NotFound(id)).into())
    }

    async fn list_groups(&self, guild_id: i64, filter: &GroupFilter) -> VishnuResult<Vec<Group>> {
        let records = self.records.lock().await;
        Ok(records
            .groups
            .values()
            .filter(|g| *g.guild_id() == guild_id && filter.matches(g))
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn join_group(&self, guild_id: i64, id: i32, member: &str) -> VishnuResult<Group> {
        let mut records = self.records.lock().await;
        let group = records
            .groups
            .get_mut(&id)
            .filter(|g| *g.guild_id() == guild_id)
            .ok_or_else(|| GroupError::new(GroupErrorKind::NotFound(id)))?;

        group.try_join(member)?;
        Ok(group.clone())
    }

    async fn delete_group(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        let mut records = self.records.lock().await;
        match records.groups.get(&id) {
            Some(g) if *g.guild_id() == guild_id => {
                records.groups.remove(&id);
                Ok(())
            }
            _ => Err(GroupError::new(GroupErrorKind::NotFound(id)).into()),
        }
    }
}
