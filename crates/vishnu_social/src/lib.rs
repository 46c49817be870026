//! Chat command handling for Vishnu.
//!
//! # Architecture
//!
//! - [`CommandRegistry`] - strips the prefix, routes to a [`BotCommand`],
//!   applies the channel and role whitelists and turns every error into a reply
//! - [`commands`] - one handler per chat command
//! - [`GuildPlatform`] - the guild side effects a handler may need (roles,
//!   group channels, announcements)
//! - [`presentation`] - monospace tables and confirmation strings
//! - `discord` - serenity client, event handler and [`GuildPlatform`]
//!   implementation, behind the `discord` feature
//!
//! Handlers never talk to the chat platform directly for replies; they return
//! a [`Reply`] and the caller delivers it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
mod context;
mod platform;
pub mod presentation;
mod registry;

#[cfg(feature = "discord")]
pub mod discord;

pub use context::{CommandContext, CommandContextBuilder, Reply};
pub use platform::GuildPlatform;
pub use registry::{BotCommand, CommandRegistry, CommandServices};
