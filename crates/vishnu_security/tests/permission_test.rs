use vishnu_core::BotConfigBuilder;
use vishnu_security::{PermissionChecker, PermissionConfig};

#[test]
fn test_permission_config_from_toml() {
    let config: PermissionConfig = toml::from_str(
        r#"
role_whitelist = ["Admin"]
chan_whitelist = [5]
"#,
    )
    .unwrap();

    let checker = PermissionChecker::new(config);
    assert!(checker.is_privileged("questdel"));
    assert!(!checker.is_privileged("questlist"));
    assert!(checker.check_command("questdel", &["Admin"]).is_ok());
    assert!(checker.check_command("questdel", &["admin"]).is_err());
    assert!(checker.channel_allowed(5));
    assert!(!checker.channel_allowed(6));
}

#[test]
fn test_permission_config_from_bot_config() {
    let bot = BotConfigBuilder::default()
        .quest_tiers(vec!["1".to_string()])
        .role_whitelist(vec!["GM".to_string()])
        .build()
        .unwrap();

    let checker = PermissionChecker::new(PermissionConfig::from(&bot));
    assert!(checker.check_command("questcomplete", &["GM"]).is_ok());
    assert!(checker.check_command("questuncomplete", &["Player"]).is_err());
    assert!(checker.channel_allowed(123));
}
