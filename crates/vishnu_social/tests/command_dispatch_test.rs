use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use vishnu_core::{
    BotConfig, BotConfigBuilder, DiceRoller, Group, GroupFilter, NewGroup, NewQuest, Quest,
    QuestFilter, ScriptedRolls,
};
use vishnu_database::{GroupStore, MemoryStore, QuestStore, RecordStore};
use vishnu_error::{DatabaseError, DatabaseErrorKind, PlatformError, PlatformErrorKind, VishnuResult};
use vishnu_social::{
    CommandContext, CommandContextBuilder, CommandRegistry, CommandServices, GuildPlatform, Reply,
};

const GUILD: u64 = 4242;
const ANNOUNCE: u64 = 555;

#[derive(Default)]
struct RecordingPlatform {
    calls: Mutex<Vec<String>>,
    announcements: Mutex<Vec<String>>,
    broken: bool,
}

impl RecordingPlatform {
    fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    fn record(&self, call: String) -> Result<(), PlatformError> {
        self.calls.lock().unwrap().push(call.clone());
        if self.broken {
            Err(PlatformError::new(PlatformErrorKind::Role {
                role: call,
                reason: "Missing Permissions".to_string(),
            }))
        } else {
            Ok(())
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GuildPlatform for RecordingPlatform {
    async fn provision_group(
        &self,
        ctx: &CommandContext,
        group: &Group,
    ) -> Result<(), PlatformError> {
        self.record(format!("provision {} for {}", group.id(), ctx.caller()))
    }

    async fn grant_group_role(
        &self,
        ctx: &CommandContext,
        group_id: i32,
    ) -> Result<(), PlatformError> {
        self.record(format!("grant {} to {}", group_id, ctx.caller()))
    }

    async fn teardown_group(
        &self,
        _ctx: &CommandContext,
        group_id: i32,
    ) -> Result<(), PlatformError> {
        self.record(format!("teardown {}", group_id))
    }

    async fn announce(&self, channel_id: u64, text: &str) -> Result<(), PlatformError> {
        self.announcements.lock().unwrap().push(text.to_string());
        self.record(format!("announce {}", channel_id))
    }
}

/// Memory store whose group deletes always fail.
struct UndeletableGroups(Arc<MemoryStore>);

#[async_trait]
impl QuestStore for UndeletableGroups {
    async fn create_quest(&self, quest: NewQuest) -> VishnuResult<Quest> {
        self.0.create_quest(quest).await
    }

    async fn list_quests(&self, guild_id: i64, filter: &QuestFilter) -> VishnuResult<Vec<Quest>> {
        self.0.list_quests(guild_id, filter).await
    }

    async fn set_quest_completed(
        &self,
        guild_id: i64,
        id: i32,
        completed: bool,
    ) -> VishnuResult<Quest> {
        self.0.set_quest_completed(guild_id, id, completed).await
    }

    async fn delete_quest(&self, guild_id: i64, id: i32) -> VishnuResult<()> {
        self.0.delete_quest(guild_id, id).await
    }
}

#[async_trait]
impl GroupStore for UndeletableGroups {
    async fn create_group(&self, group: NewGroup) -> VishnuResult<Group> {
        self.0.create_group(group).await
    }

    async fn get_group(&self, guild_id: i64, id: i32) -> VishnuResult<Group> {
        self.0.get_group(guild_id, id).await
    }

    async fn list_groups(&self, guild_id: i64, filter: &GroupFilter) -> VishnuResult<Vec<Group>> {
        self.0.list_groups(guild_id, filter).await
    }

    async fn join_group(&self, guild_id: i64, id: i32, member: &str) -> VishnuResult<Group> {
        self.0.join_group(guild_id, id, member).await
    }

    async fn delete_group(&self, _guild_id: i64, _id: i32) -> VishnuResult<()> {
        Err(DatabaseError::new(DatabaseErrorKind::Connection("connection reset".to_string())).into())
    }
}

fn config() -> BotConfigBuilder {
    let mut builder = BotConfigBuilder::default();
    builder
        .role_whitelist(vec!["Dungeon Master".to_string()])
        .quest_tiers(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        .announce_chan(ANNOUNCE);
    builder
}

struct Harness {
    registry: CommandRegistry,
    store: Arc<MemoryStore>,
    platform: Arc<RecordingPlatform>,
}

impl Harness {
    fn new() -> Self {
        Self::with(config().build().unwrap(), RecordingPlatform::default())
    }

    fn with(config: BotConfig, platform: RecordingPlatform) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::assemble(store.clone(), store, config, platform)
    }

    fn with_undeletable_groups() -> Self {
        let store = Arc::new(MemoryStore::new());
        let backend = Arc::new(UndeletableGroups(store.clone()));
        Self::assemble(backend, store, config().build().unwrap(), RecordingPlatform::default())
    }

    fn assemble(
        backend: Arc<dyn RecordStore>,
        store: Arc<MemoryStore>,
        config: BotConfig,
        platform: RecordingPlatform,
    ) -> Self {
        let platform = Arc::new(platform);
        let services = CommandServices::new(backend, platform.clone(), Arc::new(config))
            .with_roller(DiceRoller::with_source(ScriptedRolls::new([3, 5, 6, 1]), 100));
        Self {
            registry: CommandRegistry::with_default_commands(Arc::new(services)),
            store,
            platform,
        }
    }

    async fn send(&self, ctx: &CommandContext, content: &str) -> Vec<String> {
        self.registry
            .dispatch(ctx, content)
            .await
            .map(|reply| reply.messages().to_vec())
            .unwrap_or_else(|| panic!("no reply to {:?}", content))
    }
}

fn member(name: &str, roles: &[&str]) -> CommandContext {
    in_channel(name, roles, 10, "general")
}

fn in_channel(name: &str, roles: &[&str], channel_id: u64, channel_name: &str) -> CommandContext {
    CommandContextBuilder::default()
        .guild_id(GUILD)
        .channel_id(channel_id)
        .channel_name(channel_name)
        .caller(name)
        .caller_id(7u64)
        .caller_roles(roles.iter().map(|r| r.to_string()).collect::<Vec<_>>())
        .build()
        .unwrap()
}

fn dm() -> CommandContext {
    member("alice", &["Dungeon Master"])
}

#[tokio::test]
async fn test_quest_board_flow() {
    let bot = Harness::new();

    let reply = bot.send(&dm(), "!questadd 3 Slay the dragon").await;
    assert_eq!(reply, vec!["Tier 3 quest added by alice.\nDescription: Slay the dragon"]);

    let listing = bot.send(&dm(), "!questlist tier=3").await;
    assert_eq!(listing.len(), 1);
    assert!(listing[0].starts_with("```"));
    assert!(listing[0].contains("Slay the dragon"));
    assert!(listing[0].contains("DESCRIPTION"));

    let reply = bot.send(&dm(), "!questcomplete 1").await;
    assert_eq!(reply, vec!["Quest with ID 1 marked as complete."]);

    let listing = bot.send(&dm(), "!questlist tier=3").await;
    assert_eq!(listing, vec!["No open quests match."]);

    bot.send(&dm(), "!questuncomplete 1").await;
    let reply = bot.send(&dm(), "!questdel 1").await;
    assert_eq!(reply, vec!["Quest with ID 1 deleted."]);
}

#[tokio::test]
async fn test_questlist_without_filters_returns_added_quest() {
    let bot = Harness::new();

    bot.send(&dm(), "!questadd 2 Escort the caravan").await;

    let listing = bot.send(&member("bob", &[]), "!questlist").await;
    assert_eq!(listing.len(), 1);
    assert!(listing[0].contains("Escort the caravan"));
    assert!(listing[0].contains("alice"));
}

#[tokio::test]
async fn test_invalid_tier_creates_nothing() {
    let bot = Harness::new();

    let reply = bot.send(&dm(), "!questadd 9 Slay the dragon").await;
    assert!(reply[0].contains("The valid quest tiers are: 1, 2, 3."));
    assert!(reply[0].contains("You specified: 9."));

    let stored = bot
        .store
        .list_quests(GUILD as i64, &QuestFilter::default())
        .await
        .unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_unprivileged_caller_is_refused() {
    let bot = Harness::new();
    let player = member("bob", &["Player"]);

    let reply = bot.send(&player, "!questadd 3 Slay the dragon").await;
    assert_eq!(reply, vec!["Error: You do not have a role that may run `questadd`."]);

    let reply = bot.send(&player, "!groupadd 2024-09-01 4").await;
    assert!(reply[0].contains("groupadd"));

    assert!(bot.store.list_quests(GUILD as i64, &QuestFilter::default()).await.unwrap().is_empty());
    assert!(bot.store.list_groups(GUILD as i64, &GroupFilter::default()).await.unwrap().is_empty());
    assert!(bot.platform.calls().is_empty());

    // Unprivileged commands still work
    let listing = bot.send(&player, "!questlist").await;
    assert_eq!(listing, vec!["No open quests match."]);
}

#[tokio::test]
async fn test_groupadd_provisions_and_announces() {
    let bot = Harness::new();

    let reply = bot.send(&dm(), "!groupadd 2024-09-01 4 bring dice").await;
    assert_eq!(reply, vec!["Created group with ID of 1 starting on 2024-09-01."]);
    assert_eq!(
        bot.platform.calls(),
        vec!["provision 1 for alice".to_string(), format!("announce {}", ANNOUNCE)]
    );

    let announcement = bot.platform.announcements.lock().unwrap()[0].clone();
    assert!(announcement.contains("alice created a session on 2024-09-01 with a max player count of 4."));
    assert!(announcement.contains("Use `!groupjoin 1` to join this session."));
    assert!(announcement.contains("Additional notes: bring dice"));

    let listing = bot.send(&dm(), "!grouplist creator=alice").await;
    assert!(listing[0].contains("0/4"));
}

#[tokio::test]
async fn test_groupadd_rejects_bad_arguments() {
    let bot = Harness::new();

    let reply = bot.send(&dm(), "!groupadd 09/01/2024 4").await;
    assert!(reply[0].starts_with("Error:"));

    let reply = bot.send(&dm(), "!groupadd 2024-09-01 0").await;
    assert!(reply[0].starts_with("Error:"));

    let reply = bot.send(&dm(), "!groupadd 2024-09-01").await;
    assert!(reply[0].contains("max users"));

    assert!(bot.platform.calls().is_empty());
}

#[tokio::test]
async fn test_platform_failures_do_not_undo_records() {
    let bot = Harness::with(config().build().unwrap(), RecordingPlatform::broken());

    let reply = bot.send(&dm(), "!groupadd 2024-09-01 4").await;
    assert_eq!(reply[0], "Created group with ID of 1 starting on 2024-09-01.");
    assert!(reply.len() > 1);
    assert!(reply[1].contains("Missing Permissions"));

    let stored = bot.store.get_group(GUILD as i64, 1).await.unwrap();
    assert_eq!(stored.creator(), "alice");
}

#[tokio::test]
async fn test_groupjoin_until_full() {
    let bot = Harness::new();
    bot.send(&dm(), "!groupadd 2024-09-01 1").await;

    let reply = bot.send(&member("bob", &[]), "!groupjoin 1").await;
    assert_eq!(reply, vec!["bob joined group with ID of 1!"]);
    assert!(bot.platform.calls().contains(&"grant 1 to bob".to_string()));

    let reply = bot.send(&member("carol", &[]), "!groupjoin 1").await;
    assert_eq!(reply, vec!["Group is already full! (1/1)"]);

    let reply = bot.send(&member("bob", &[]), "!groupjoin 1").await;
    assert_eq!(reply, vec!["bob is already a member of this group!"]);

    let reply = bot.send(&member("bob", &[]), "!groupjoin 99").await;
    assert_eq!(reply, vec!["Error: No group with ID 99 exists."]);
}

#[tokio::test]
async fn test_groupclose_is_owner_only() {
    let bot = Harness::new();
    bot.send(&dm(), "!groupadd 2024-09-01 3").await;

    let group_channel = |name: &str| in_channel(name, &[], 77, "group-1-text");

    let reply = bot.send(&group_channel("bob"), "!groupclose").await;
    assert_eq!(reply, vec!["You are not the owner of this group!"]);
    assert!(bot.store.get_group(GUILD as i64, 1).await.is_ok());

    let reply = bot.send(&group_channel("alice"), "!groupclose").await;
    assert_eq!(reply, vec!["Group with ID of 1 has been closed."]);
    assert!(bot.platform.calls().contains(&"teardown 1".to_string()));
    assert!(bot.store.get_group(GUILD as i64, 1).await.is_err());
}

#[tokio::test]
async fn test_groupclose_announces_after_teardown() {
    let bot = Harness::new();
    bot.send(&dm(), "!groupadd 2024-09-01 3").await;

    let reply = bot
        .send(&in_channel("alice", &[], 77, "group-1-text"), "!groupclose")
        .await;
    assert_eq!(reply, vec!["Group with ID of 1 has been closed."]);

    let calls = bot.platform.calls();
    assert_eq!(&calls[calls.len() - 2..], &["teardown 1".to_string(), format!("announce {}", ANNOUNCE)]);
    let announcements = bot.platform.announcements.lock().unwrap().clone();
    assert_eq!(announcements.last().unwrap(), "Group with ID of 1 has been closed.");
}

#[tokio::test]
async fn test_groupclose_keeps_channels_when_delete_fails() {
    let bot = Harness::with_undeletable_groups();
    bot.send(&dm(), "!groupadd 2024-09-01 3").await;

    let reply = bot
        .send(&in_channel("alice", &[], 77, "group-1-text"), "!groupclose")
        .await;
    assert_eq!(reply.len(), 1);
    assert!(reply[0].starts_with("Error:"));

    assert!(!bot.platform.calls().contains(&"teardown 1".to_string()));
    assert!(bot.store.get_group(GUILD as i64, 1).await.is_ok());
}

#[tokio::test]
async fn test_groupclose_outside_group_channel() {
    let bot = Harness::new();

    let reply = bot.send(&dm(), "!groupclose").await;
    assert_eq!(reply, vec!["Error: Run this command in the group's text channel."]);
}

#[tokio::test]
async fn test_roll_reports_each_token() {
    let bot = Harness::new();

    let reply = bot.send(&member("bob", &[]), "!roll 2d6+1 abc 0d6+2").await;
    assert_eq!(
        reply,
        vec![
            "You rolled: 3, 5.\nYour total is 9".to_string(),
            "Error: `abc` is not a valid roll. Use a format like `3d8` or `3d8+4`.".to_string(),
            "You rolled no dice.\nYour total is 2".to_string(),
        ]
    );

    let reply = bot.send(&member("bob", &[]), "!roll").await;
    assert!(reply[0].starts_with("Error:"));
}

#[tokio::test]
async fn test_messages_not_for_the_bot() {
    let bot = Harness::new();

    assert!(bot.registry.dispatch(&dm(), "hello there").await.is_none());
    assert!(bot.registry.dispatch(&dm(), "!").await.is_none());

    let reply = bot.send(&dm(), "!dance").await;
    assert_eq!(reply, vec!["Error: `dance` is not a command. Use `help` to list commands."]);
}

#[tokio::test]
async fn test_channel_whitelist() {
    let mut builder = config();
    builder.chan_whitelist(vec![10u64]);
    let bot = Harness::with(builder.build().unwrap(), RecordingPlatform::default());

    assert!(bot.registry.dispatch(&in_channel("bob", &[], 20, "off-topic"), "!roll 1d6").await.is_none());
    assert!(bot.registry.dispatch(&in_channel("bob", &[], 20, "off-topic"), "!dance").await.is_none());
    assert!(bot.registry.dispatch(&in_channel("bob", &[], 10, "dice"), "!roll 1d6").await.is_some());

    // groupclose runs in group channels, which are never whitelisted
    bot.send(&dm(), "!groupadd 2024-09-01 3").await;
    let reply = bot.send(&in_channel("alice", &[], 30, "group-1-text"), "!groupclose").await;
    assert_eq!(reply, vec!["Group with ID of 1 has been closed."]);
}

#[tokio::test]
async fn test_help_lists_commands() {
    let bot = Harness::new();

    let reply: Reply = bot.registry.dispatch(&dm(), "!help").await.unwrap();
    let text = &reply.messages()[0];
    for name in bot.registry.command_names() {
        assert!(text.contains(&format!("!{}", name)), "help is missing {}", name);
    }
    assert!(text.contains("!groupadd <YYYY-MM-DD> <max_users> [notes...]"));
}
