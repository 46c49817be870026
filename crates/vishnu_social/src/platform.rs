//! Guild side effects requested by command handlers.

use crate::CommandContext;
use async_trait::async_trait;
use vishnu_core::Group;
use vishnu_error::PlatformError;

/// Operations on the guild a command was issued in.
///
/// Handlers treat failures here as non-fatal: the record change stands and
/// the caller is told what could not be done.
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// Create the `group-<id>` role, give it to the caller, and create the
    /// group's private text and voice channels.
    async fn provision_group(&self, ctx: &CommandContext, group: &Group)
    -> Result<(), PlatformError>;

    /// Give the caller the group's role.
    async fn grant_group_role(&self, ctx: &CommandContext, group_id: i32)
    -> Result<(), PlatformError>;

    /// Delete the group's role and channels.
    async fn teardown_group(&self, ctx: &CommandContext, group_id: i32)
    -> Result<(), PlatformError>;

    /// Post `text` in `channel_id`.
    async fn announce(&self, channel_id: u64, text: &str) -> Result<(), PlatformError>;
}
