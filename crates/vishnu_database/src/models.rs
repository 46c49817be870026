//! Diesel models for the quest and group tables.

use crate::schema::{groups, quests};
use chrono::NaiveDate;
use diesel::prelude::*;
use vishnu_core::{Capacity, Group, NewGroup, NewQuest, Quest};
use vishnu_error::{DatabaseError, DatabaseErrorKind};

/// Database row for the quests table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = quests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(missing_docs)]
pub struct QuestRow {
    pub id: i32,
    pub guild_id: i64,
    pub tier: String,
    pub description: String,
    pub creator: String,
    pub completed: bool,
}

/// Insertable struct for the quests table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = quests)]
#[allow(missing_docs)]
pub struct NewQuestRow {
    pub guild_id: i64,
    pub tier: String,
    pub description: String,
    pub creator: String,
    pub completed: bool,
}

impl From<QuestRow> for Quest {
    fn from(row: QuestRow) -> Self {
        Quest::from_parts(
            row.id,
            row.guild_id,
            row.tier,
            row.description,
            row.creator,
            row.completed,
        )
    }
}

impl From<&NewQuest> for NewQuestRow {
    fn from(quest: &NewQuest) -> Self {
        Self {
            guild_id: *quest.guild_id(),
            tier: quest.tier().clone(),
            description: quest.description().clone(),
            creator: quest.creator().clone(),
            completed: false,
        }
    }
}

/// Database row for the groups table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(missing_docs)]
pub struct GroupRow {
    pub id: i32,
    pub guild_id: i64,
    pub creator: String,
    pub start_date: NaiveDate,
    pub filled: i32,
    pub max_users: i32,
    pub notes: Option<String>,
    pub members: Vec<String>,
}

/// Insertable struct for the groups table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = groups)]
#[allow(missing_docs)]
pub struct NewGroupRow {
    pub guild_id: i64,
    pub creator: String,
    pub start_date: NaiveDate,
    pub filled: i32,
    pub max_users: i32,
    pub notes: Option<String>,
    pub members: Vec<String>,
}

impl TryFrom<GroupRow> for Group {
    type Error = DatabaseError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        let corrupt = || {
            DatabaseError::new(DatabaseErrorKind::CorruptRow(format!(
                "group {} has capacity {}/{}",
                row.id, row.filled, row.max_users
            )))
        };

        let filled = u32::try_from(row.filled).map_err(|_| corrupt())?;
        let max = u32::try_from(row.max_users).map_err(|_| corrupt())?;
        let capacity = Capacity::new(filled, max).ok_or_else(corrupt)?;

        Ok(Group::from_parts(
            row.id,
            row.guild_id,
            row.creator,
            row.start_date,
            capacity,
            row.notes,
            row.members,
        ))
    }
}

impl TryFrom<&NewGroup> for NewGroupRow {
    type Error = DatabaseError;

    fn try_from(group: &NewGroup) -> Result<Self, Self::Error> {
        let max_users = i32::try_from(*group.max_users()).map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Query(format!(
                "max_users {} does not fit the groups table",
                group.max_users()
            )))
        })?;

        Ok(Self {
            guild_id: *group.guild_id(),
            creator: group.creator().clone(),
            start_date: *group.start_date(),
            filled: 0,
            max_users,
            notes: group.notes().clone(),
            members: Vec::new(),
        })
    }
}
