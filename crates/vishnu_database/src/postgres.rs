//! PostgreSQL record store.

use crate::connection::{PgPool, establish_pool, run_migrations};
use crate::models::{GroupRow, NewGroupRow, NewQuestRow, QuestRow};
use crate::schema::{groups, quests};
use crate::store::{GroupStore, QuestStore};
use crate::DatabaseResult;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::time::Duration;
use tracing::{debug, info, instrument};
use vishnu_core::{Group, GroupFilter, NewGroup, NewQuest, Quest, QuestFilter, StoreSettings};
use vishnu_error::{
    DatabaseError, DatabaseErrorKind, GroupError, GroupErrorKind, QuestError, QuestErrorKind,
    VishnuResult,
};

/// Record store backed by PostgreSQL.
///
/// Blocking diesel calls run on tokio's blocking pool with a connection
/// checked out of an r2d2 pool; the connection returns to the pool when the
/// call finishes, whatever the outcome.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect with the pool size and call deadline from `settings`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vishnu_core::StoreSettings;
    /// use vishnu_database::PostgresStore;
    ///
    /// let store = PostgresStore::connect("postgres://localhost/vishnu", &StoreSettings::default())
    ///     .expect("Failed to connect");
    /// ```
    pub fn connect(database_url: &str, settings: &StoreSettings) -> DatabaseResult<Self> {
        let deadline = Duration::from_millis(*settings.timeout_ms());
        Ok(Self::from_pool(establish_pool(database_url, *settings.pool_size(), deadline)?))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply pending schema migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> VishnuResult<usize> {
        let applied = self.with_conn(|conn| Ok(run_migrations(conn)?)).await?;
        info!(applied, "Migrations applied");
        Ok(applied)
    }

    async fn with_conn<T, F>(&self, f: F) -> VishnuResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> VishnuResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || -> VishnuResult<T> {
            let mut conn = pool.get().map_err(DatabaseError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
    }
}

#[async_trait]
impl QuestStore for PostgresStore {
    #[instrument(skip(self, quest), fields(guild_id = quest.guild_id(), tier = %quest.tier()))]
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest> {
        let row = NewQuestRow::from(&quest);

        let stored = self
            .with_conn(move |conn| {
                Ok(diesel::insert_into(quests::table)
                    .values(&row)
                    .returning(QuestRow::as_returning())
                    .get_result(conn)?)
            })
            .await?;

        debug!(id = stored.id, "Quest stored");
        Ok(stored.into())
    }

    #[instrument(skip(self))]
    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>> {
        let filter = filter.clone();

        let rows = self
            .with_conn(move |conn| {
                let mut query = quests::table
                    .filter(quests::guild_id.eq(guild_id))
                    .filter(quests::completed.eq(false))
                    .into_boxed();

                if let Some(id) = filter.id {
                    query = query.filter(quests::id.eq(id));
                }
                if let Some(tier) = filter.tier {
                    query = query.filter(quests::tier.eq(tier));
                }
                if let Some(creator) = filter.creator {
                    query = query.filter(quests::creator.eq(creator));
                }

                Ok(query
                    .order(quests::id.asc())
                    .select(QuestRow::as_select())
                    .load(conn)?)
            })
            .await?;

        debug!(count = rows.len(), "Quests loaded");
        Ok(rows.into_iter().map(Quest::from).collect())
    }

    #[instrument(skip(self))]
    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest> {
        let row = self
            .with_conn(move |conn| {
                Ok(diesel::update(
                    quests::table
                        .filter(quests::guild_id.eq(guild_id))
                        .filter(quests::id.eq(id)),
                )
                .set(quests::completed.eq(completed))
                .returning(QuestRow::as_returning())
                .get_result(conn)
                .optional()?)
            })
            .await?;

        row.map(Quest::from)
            .ok_or_else(|| QuestError::new(QuestErrorKind::NotFound(id)).into())
    }

    #[instrument(skip(self))]
    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        let deleted = self
            .with_conn(move |conn| {
                Ok(diesel::delete(
                    quests::table
                        .filter(quests::guild_id.eq(guild_id))
                        .filter(quests::id.eq(id)),
                )
                .execute(conn)?)
            })
            .await?;

        if deleted == 0 {
            return Err(QuestError::new(QuestErrorKind::NotFound(id)).into());
        }
        Ok(())
    }
}

#[async_trait]
impl GroupStore for PostgresStore {
    #[instrument(skip(self, group), fields(guild_id = group.guild_id(), creator = %group.creator()))]
    async fn create_group(&self, group: NewGroup) -> VishnuResult<Group> {
        let row = NewGroupRow::try_from(&group)?;

        let stored = self
            .with_conn(move |conn| {
                Ok(diesel::insert_into(groups::table)
                    .values(&row)
                    .returning(GroupRow::as_returning())
                    .get_result(conn)?)
            })
            .await?;

        debug!(id = stored.id, "Group stored");
        Ok(Group::try_from(stored)?)
    }

    #[instrument(skip(self))]
    async fn get_group(&self, guild_id: i64, id: i32) -> VishnuResult<Group> {
        let row = self
            .with_conn(move |conn| {
                Ok(groups::table
                    .filter(groups::guild_id.eq(guild_id))
                    .filter(groups::id.eq(id))
                    .select(GroupRow::as_select())
                    .first(conn)
                    .optional()?)
            })
            .await?;

        match row {
            Some(row) => Ok(Group::try_from(row)?),
            None => Err(GroupError::new(GroupErrorKind::NotFound(id)).into()),
        }
    }

    #[instrument(skip(self))]
    async fn list_groups(&self, guild_id: i64, filter: &GroupFilter) -> VishnuResult<Vec<Group>> {
        let filter = filter.clone();

        let rows = self
            .with_conn(move |conn| {
                let mut query = groups::table
                    .filter(groups::guild_id.eq(guild_id))
                    .into_boxed();

                if let Some(id) = filter.id {
                    query = query.filter(groups::id.eq(id));
                }
                if let Some(creator) = filter.creator {
                    query = query.filter(groups::creator.eq(creator));
                }

                Ok(query
                    .order(groups::id.asc())
                    .select(GroupRow::as_select())
                    .load(conn)?)
            })
            .await?;

        debug!(count = rows.len(), "Groups loaded");
        rows.into_iter()
            .map(|row| Group::try_from(row).map_err(Into::into))
            .collect()
    }

    #[instrument(skip(self))]
    async fn join_group(&self, guild_id: i64, id: i32, member: &str) -> VishnuResult<Group> {
        let member = member.to_string();

        self.with_conn(move |conn| {
            conn.transaction(|conn| {
                // Row lock serializes concurrent joins on the same group
                let row = groups::table
                    .filter(groups::guild_id.eq(guild_id))
                    .filter(groups::id.eq(id))
                    .select(GroupRow::as_select())
                    .for_update()
                    .first(conn)
                    .optional()?
                    .ok_or_else(|| GroupError::new(GroupErrorKind::NotFound(id)))?;

                let mut group = Group::try_from(row)?;
                group.try_join(&member)?;

                let filled = i32::try_from(*group.capacity().filled()).map_err(|_| {
                    DatabaseError::new(DatabaseErrorKind::CorruptRow(format!(
                        "group {} capacity overflow",
                        id
                    )))
                })?;

                diesel::update(groups::table.find(id))
                    .set((
                        groups::filled.eq(filled),
                        groups::members.eq(group.members()),
                    ))
                    .execute(conn)?;

                debug!(filled, "Member added");
                Ok(group)
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        let deleted = self
            .with_conn(move |conn| {
                Ok(diesel::delete(
                    groups::table
                        .filter(groups::guild_id.eq(guild_id))
                        .filter(groups::id.eq(id)),
                )
                .execute(conn)?)
            })
            .await?;

        if deleted == 0 {
            return Err(GroupError::new(GroupErrorKind::NotFound(id)).into());
        }
        Ok(())
    }
}
