use std::sync::Arc;
use vishnu_core::{GroupFilter, NewGroup, NewQuest, QuestFilter};
use vishnu_database::{GroupStore, MemoryStore, QuestStore};
use vishnu_error::{GroupErrorKind, QuestErrorKind, VishnuErrorKind};

const GUILD: i64 = 100;

fn tiers() -> Vec<String> {
    vec!["1".to_string(), "2".to_string(), "3".to_string()]
}

fn quest(tier: &str, description: &str, creator: &str) -> NewQuest {
    let words: Vec<&str> = description.split_whitespace().collect();
    NewQuest::validate(GUILD, tier, &words, creator, &tiers()).unwrap()
}

fn group(max: u32) -> NewGroup {
    let none: [&str; 0] = [];
    NewGroup::parse(GUILD, "gm", "2024-09-01", &max.to_string(), &none).unwrap()
}

#[tokio::test]
async fn test_quest_lifecycle() {
    let store = MemoryStore::new();

    let slay = store.create_quest(quest("3", "Slay the dragon", "alice")).await.unwrap();
    store.create_quest(quest("2", "Find the ring", "bob")).await.unwrap();
    store.create_quest(quest("3", "Guard the gate", "carol")).await.unwrap();

    let tier3 = QuestFilter::parse(&["tier=3"]).unwrap();
    let listed = store.list_quests(GUILD, &tier3).await.unwrap();
    assert_eq!(listed.iter().map(|q| *q.id()).collect::<Vec<_>>(), vec![1, 3]);

    store.set_quest_completed(GUILD, *slay.id(), true).await.unwrap();
    let again = store.set_quest_completed(GUILD, *slay.id(), true).await.unwrap();
    assert!(again.completed());

    let listed = store.list_quests(GUILD, &tier3).await.unwrap();
    assert_eq!(listed.iter().map(|q| *q.id()).collect::<Vec<_>>(), vec![3]);

    store.set_quest_completed(GUILD, *slay.id(), false).await.unwrap();
    let listed = store.list_quests(GUILD, &tier3).await.unwrap();
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn test_missing_quest_is_not_found() {
    let store = MemoryStore::new();

    let err = store.set_quest_completed(GUILD, 42, true).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VishnuErrorKind::Quest(e) if matches!(e.kind(), QuestErrorKind::NotFound(42))
    ));

    let err = store.delete_quest(GUILD, 42).await.unwrap_err();
    assert!(matches!(err.kind(), VishnuErrorKind::Quest(_)));
}

#[tokio::test]
async fn test_records_are_scoped_by_guild() {
    let store = MemoryStore::new();
    let q = store.create_quest(quest("1", "Local errand", "alice")).await.unwrap();

    assert!(store.list_quests(GUILD + 1, &QuestFilter::default()).await.unwrap().is_empty());
    assert!(store.delete_quest(GUILD + 1, *q.id()).await.is_err());
    assert!(store.delete_quest(GUILD, *q.id()).await.is_ok());
}

#[tokio::test]
async fn test_group_join_until_full() {
    let store = MemoryStore::new();
    let g = store.create_group(group(1)).await.unwrap();

    let joined = store.join_group(GUILD, *g.id(), "alice").await.unwrap();
    assert_eq!(*joined.capacity().filled(), 1);

    let err = store.join_group(GUILD, *g.id(), "bob").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VishnuErrorKind::Group(e) if matches!(e.kind(), GroupErrorKind::Full { .. })
    ));

    let stored = store.get_group(GUILD, *g.id()).await.unwrap();
    assert_eq!(stored.members(), &vec!["alice".to_string()]);
}

#[tokio::test]
async fn test_concurrent_joins_never_exceed_max() {
    let store = Arc::new(MemoryStore::new());
    let g = store.create_group(group(3)).await.unwrap();
    let id = *g.id();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.join_group(GUILD, id, &format!("player{}", i)).await })
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 3);
    let stored = store.get_group(GUILD, id).await.unwrap();
    assert_eq!(stored.capacity().to_string(), "3/3");
    assert_eq!(stored.members().len(), 3);
}

#[tokio::test]
async fn test_group_listing_and_delete() {
    let store = MemoryStore::new();
    let first = store.create_group(group(2)).await.unwrap();
    let second = store.create_group(group(4)).await.unwrap();
    assert_eq!(*second.id(), *first.id() + 1);

    let by_id = GroupFilter::parse(&[format!("id={}", second.id())]).unwrap();
    let listed = store.list_groups(GUILD, &by_id).await.unwrap();
    assert_eq!(listed.len(), 1);

    store.delete_group(GUILD, *first.id()).await.unwrap();
    let err = store.get_group(GUILD, *first.id()).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        VishnuErrorKind::Group(e) if matches!(e.kind(), GroupErrorKind::NotFound(_))
    ));

    // Ids are not reused after a delete
    let third = store.create_group(group(2)).await.unwrap();
    assert_eq!(*third.id(), *second.id() + 1);
}
