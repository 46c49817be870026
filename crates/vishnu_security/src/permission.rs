//! Role and channel permission model.

use crate::SecurityResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, instrument};
use vishnu_core::BotConfig;
use vishnu_error::{SecurityError, SecurityErrorKind};

/// Commands that require a whitelisted role.
pub const PRIVILEGED_COMMANDS: [&str; 5] = [
    "questadd",
    "questdel",
    "questcomplete",
    "questuncomplete",
    "groupadd",
];

/// True if any of `caller_roles` is in `required`.
///
/// An empty `required` set authorizes nobody.
pub fn authorize<S: AsRef<str>>(caller_roles: &[S], required: &HashSet<String>) -> bool {
    caller_roles.iter().any(|role| required.contains(role.as_ref()))
}

/// Permission configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionConfig {
    /// Commands gated by the role whitelist
    #[serde(default = "default_privileged")]
    pub privileged_commands: HashSet<String>,

    /// Roles allowed to run privileged commands
    #[serde(default)]
    pub role_whitelist: HashSet<String>,

    /// Channels accepting commands; every channel when unset
    #[serde(default)]
    pub chan_whitelist: Option<HashSet<u64>>,
}

fn default_privileged() -> HashSet<String> {
    PRIVILEGED_COMMANDS.iter().map(|c| c.to_string()).collect()
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            privileged_commands: default_privileged(),
            role_whitelist: HashSet::new(),
            chan_whitelist: None,
        }
    }
}

impl From<&BotConfig> for PermissionConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            privileged_commands: default_privileged(),
            role_whitelist: config.role_whitelist().iter().cloned().collect(),
            chan_whitelist: config
                .chan_whitelist()
                .as_ref()
                .map(|channels| channels.iter().copied().collect()),
        }
    }
}

/// Permission checker consulted by the command dispatcher.
#[derive(Debug, Clone, Default)]
pub struct PermissionChecker {
    config: PermissionConfig,
}

impl PermissionChecker {
    /// Create a new permission checker with the given configuration.
    pub fn new(config: PermissionConfig) -> Self {
        Self { config }
    }

    /// Whether `command` needs a whitelisted role.
    pub fn is_privileged(&self, command: &str) -> bool {
        self.config.privileged_commands.contains(command)
    }

    /// Check that the caller may run `command`.
    ///
    /// Unprivileged commands always pass.
    #[instrument(skip(self, caller_roles), fields(roles = caller_roles.len()))]
    pub fn check_command<S: AsRef<str>>(
        &self,
        command: &str,
        caller_roles: &[S],
    ) -> SecurityResult<()> {
        if !self.is_privileged(command) {
            return Ok(());
        }

        if authorize(caller_roles, &self.config.role_whitelist) {
            debug!("Command permitted");
            Ok(())
        } else {
            debug!("Caller holds no whitelisted role");
            Err(SecurityError::new(SecurityErrorKind::PermissionDenied {
                command: command.to_string(),
                reason: "caller holds none of the whitelisted roles".to_string(),
            }))
        }
    }

    /// True if commands are accepted in `channel_id`.
    pub fn channel_allowed(&self, channel_id: u64) -> bool {
        self.config
            .chan_whitelist
            .as_ref()
            .is_none_or(|channels| channels.contains(&channel_id))
    }

    /// Check the channel whitelist.
    pub fn check_channel(&self, channel_id: u64) -> SecurityResult<()> {
        if self.channel_allowed(channel_id) {
            Ok(())
        } else {
            Err(SecurityError::new(SecurityErrorKind::ChannelNotAllowed(
                channel_id,
            )))
        }
    }
}
