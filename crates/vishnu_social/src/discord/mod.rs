//! Discord integration for Vishnu.
//!
//! - **client**: serenity client setup and lifecycle
//! - **handler**: turns guild messages into [`CommandContext`](crate::CommandContext)s,
//!   dispatches them and sends the replies
//! - **platform**: [`GuildPlatform`](crate::GuildPlatform) over the Discord HTTP API
//!
//! Available with the `discord` feature.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vishnu_social::discord::{SerenityPlatform, VishnuBot};
//!
//! let platform = Arc::new(SerenityPlatform::from_token(&token, *config.group_category()));
//! let registry = Arc::new(CommandRegistry::with_default_commands(services));
//! VishnuBot::new(&token, registry).await?.start().await?;
//! ```

mod client;
mod handler;
mod platform;

pub use client::VishnuBot;
pub use handler::VishnuHandler;
pub use platform::SerenityPlatform;
