//! Timeout and retry policy around a record store.

use crate::store::{GroupStore, QuestStore};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;
use vishnu_core::{Group, GroupFilter, NewGroup, NewQuest, Quest, QuestFilter, StoreSettings};
use vishnu_error::{DatabaseError, DatabaseErrorKind, RetryableError, VishnuResult};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Store wrapper that bounds every call by a deadline and retries while the
/// inner store is unreachable.
///
/// Each attempt gets the full deadline. An elapsed deadline surfaces as
/// [`DatabaseErrorKind::Timeout`] and is not retried; connection and pool
/// failures are retried with exponential backoff and jitter; every other
/// error is returned as-is.
#[derive(Debug, Clone)]
pub struct ResilientStore<S> {
    inner: S,
    timeout: Duration,
    attempts: usize,
    backoff_ms: u64,
}

impl<S> ResilientStore<S> {
    /// Wrap `inner` using the configured store policy.
    pub fn new(inner: S, settings: &StoreSettings) -> Self {
        Self::with_policy(
            inner,
            Duration::from_millis(*settings.timeout_ms()),
            *settings.retry_attempts(),
            *settings.retry_backoff_ms(),
        )
    }

    /// Wrap `inner` with an explicit policy.
    ///
    /// `attempts` counts the first call; the first retry waits about
    /// `backoff_ms` and each later one doubles it.
    pub fn with_policy(inner: S, timeout: Duration, attempts: usize, backoff_ms: u64) -> Self {
        Self {
            inner,
            timeout,
            attempts: attempts.max(1),
            backoff_ms,
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn call<T, F, Fut>(&self, operation: &'static str, f: F) -> VishnuResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = VishnuResult<T>>,
    {
        // Delays grow as 2^n * factor, so factor = backoff / 2 makes the first one `backoff_ms`
        let strategy = ExponentialBackoff::from_millis(2)
            .factor((self.backoff_ms / 2).max(1))
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.attempts - 1);

        let f = &f;
        let timeout = self.timeout;

        Retry::spawn(strategy, move || async move {
            match tokio::time::timeout(timeout, f()).await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) if e.is_retryable() => {
                    warn!(operation, error = %e, "Store unavailable, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Ok(Err(e)) => Err(RetryError::Permanent(e)),
                Err(_) => {
                    warn!(operation, timeout_ms = timeout.as_millis() as u64, "Store call timed out");
                    Err(RetryError::Permanent(
                        DatabaseError::new(DatabaseErrorKind::Timeout {
                            operation: operation.to_string(),
                            millis: timeout.as_millis() as u64,
                        })
                        .into(),
                    ))
                }
            }
        })
        .await
    }
}

#[async_trait]
impl<S: QuestStore> QuestStore for ResilientStore<S> {
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest> {
        self.call("create_quest", || self.inner.create_quest(quest.clone()))
            .await
    }

    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>> {
        self.call("list_quests", || self.inner.list_quests(guild_id, filter))
            .await
    }

    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest> {
        self.call("set_quest_completed", || {
            self.inner.set_quest_completed(guild_id, id, completed)
        })
        .await
    }

    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        self.call("delete_quest", || self.inner.delete_quest(guild_id, id))
            .await
    }
}

#[async_trait]
impl<S: GroupStore> GroupStore for ResilientStore<S> {
    async fn create_group(&self, group: NewGroup) -> VishnuResult<Group> {
        self.call("create_group", || self.inner.create_group(group.clone()))
            .await
    }

    async fn get_group(&self, guild_id: i64, id: i32) -> VishnuResult<Group> {
        self.call("get_group", || self.inner.get_group(guild_id, id))
            .await
    }

    async fn list_groups(&self, guild_id: i64, filter: &GroupFilter) -> VishnuResult<Vec<Group>> {
        self.call("list_groups", || self.inner.list_groups(guild_id, filter))
            .await
    }

    async fn join_group(&self, guild_id: i64, id: i32, member: &str) -> VishnuResult<Group> {
        self.call("join_group", || self.inner.join_group(guild_id, id, member))
            .await
    }

    async fn delete_group(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        self.call("delete_group", || self.inner.delete_group(guild_id, id))
            .await
    }
}
