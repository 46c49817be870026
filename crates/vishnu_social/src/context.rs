//! Invocation context and replies.

use derive_getters::Getters;

/// Who issued a command, and where.
///
/// Built by the platform adapter from the incoming message.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CommandContext {
    /// Guild the message was sent in
    guild_id: u64,
    /// Channel the message was sent in
    channel_id: u64,
    /// Channel name, used to find the group a group channel belongs to
    #[builder(default)]
    channel_name: String,
    /// Caller identity as stored on records
    caller: String,
    /// Platform user id of the caller
    #[builder(default)]
    caller_id: u64,
    /// Names of the roles the caller holds
    #[builder(default)]
    caller_roles: Vec<String>,
}

impl CommandContext {
    /// Guild id in the store's signed representation.
    pub fn store_guild_id(&self) -> i64 {
        // Snowflakes fit in 63 bits
        self.guild_id as i64
    }
}

/// Text messages sent back to the channel, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    messages: Vec<String>,
}

impl Reply {
    /// A reply consisting of one message.
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// A reply of several messages.
    pub fn many(messages: impl IntoIterator<Item = String>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    /// Append a message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Messages to send.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// True when there is nothing to send.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
