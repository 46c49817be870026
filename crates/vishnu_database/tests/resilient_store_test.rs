use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vishnu_core::{NewQuest, Quest, QuestFilter};
use vishnu_database::{MemoryStore, QuestStore, ResilientStore};
use vishnu_error::{DatabaseError, DatabaseErrorKind, VishnuErrorKind, VishnuResult};

const GUILD: i64 = 7;

/// How the wrapped store misbehaves.
enum Fault {
    /// Connection failures for the first N calls
    Unavailable(usize),
    /// A query error on every call
    Rejected,
    /// Calls take longer than any sensible deadline
    Slow(Duration),
}

struct FaultyStore {
    inner: MemoryStore,
    fault: Fault,
    calls: AtomicUsize,
}

impl FaultyStore {
    fn new(fault: Fault) -> Self {
        Self {
            inner: MemoryStore::new(),
            fault,
            calls: AtomicUsize::new(0),
        }
    }

    async fn misbehave(&self) -> VishnuResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fault {
            Fault::Unavailable(n) if call < n => Err(DatabaseError::new(
                DatabaseErrorKind::Connection("connection reset".to_string()),
            )
            .into()),
            Fault::Unavailable(_) => Ok(()),
            Fault::Rejected => Err(DatabaseError::new(DatabaseErrorKind::Query(
                "syntax error".to_string(),
            ))
            .into()),
            Fault::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl QuestStore for FaultyStore {
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest> {
        self.misbehave().await?;
        self.inner.create_quest(quest).await
    }

    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>> {
        self.misbehave().await?;
        self.inner.list_quests(guild_id, filter).await
    }

    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest> {
        self.misbehave().await?;
        self.inner.set_quest_completed(guild_id, id, completed).await
    }

    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        self.misbehave().await?;
        self.inner.delete_quest(guild_id, id).await
    }
}

fn wrap(fault: Fault, attempts: usize) -> ResilientStore<FaultyStore> {
    ResilientStore::with_policy(
        FaultyStore::new(fault),
        Duration::from_millis(500),
        attempts,
        10,
    )
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_store_is_retried() {
    let store = wrap(Fault::Unavailable(2), 3);

    let quests = store.list_quests(GUILD, &QuestFilter::default()).await.unwrap();
    assert!(quests.is_empty());
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let store = wrap(Fault::Unavailable(10), 3);

    let err = store.list_quests(GUILD, &QuestFilter::default()).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VishnuErrorKind::Database(e) if e.kind.is_unavailable()
    ));
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_errors_are_not_retried() {
    let store = wrap(Fault::Rejected, 3);

    let err = store.delete_quest(GUILD, 1).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VishnuErrorKind::Database(e) if matches!(e.kind, DatabaseErrorKind::Query(_))
    ));
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_passes_through() {
    let store = wrap(Fault::Unavailable(0), 3);

    let err = store.set_quest_completed(GUILD, 99, true).await.unwrap_err();
    assert!(matches!(err.kind(), VishnuErrorKind::Quest(_)));
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_times_out() {
    let store = wrap(Fault::Slow(Duration::from_secs(30)), 3);

    let err = store.list_quests(GUILD, &QuestFilter::default()).await.unwrap_err();
    match err.kind() {
        VishnuErrorKind::Database(e) => match &e.kind {
            DatabaseErrorKind::Timeout { operation, millis } => {
                assert_eq!(operation, "list_quests");
                assert_eq!(*millis, 500);
            }
            other => panic!("expected timeout, got {:?}", other),
        },
        other => panic!("expected database error, got {:?}", other),
    }
    assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
}
