//! Error types for the Vishnu bot.
//!
//! This crate provides the foundation error types used throughout the Vishnu workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Every error can be rendered for the person who issued a chat command with
//! [`VishnuError::user_message`]; the location-tagged `Display` output is meant
//! for logs.
//!
//! # Examples
//!
//! ```
//! use vishnu_error::{ParseError, ParseErrorKind, VishnuResult};
//!
//! fn parse_count(raw: &str) -> VishnuResult<u32> {
//!     raw.parse().map_err(|_| {
//!         ParseError::new(ParseErrorKind::InvalidInteger {
//!             field: "count".to_string(),
//!             value: raw.to_string(),
//!         })
//!         .into()
//!     })
//! }
//!
//! assert!(parse_count("three").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod group;
mod parse;
mod platform;
mod quest;
mod retry;
mod security;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{VishnuError, VishnuErrorKind, VishnuResult};
pub use group::{GroupError, GroupErrorKind};
pub use parse::{ParseError, ParseErrorKind};
pub use platform::{PlatformError, PlatformErrorKind};
pub use quest::{QuestError, QuestErrorKind};
pub use retry::RetryableError;
pub use security::{SecurityError, SecurityErrorKind};
