//! Authorization guard for Vishnu commands.
//!
//! Two checks run before a handler touches the store:
//!
//! - **Channel whitelist** - when configured, commands are only accepted in
//!   the listed channels
//! - **Role whitelist** - privileged commands require the caller to hold at
//!   least one whitelisted role
//!
//! Role membership is supplied by the chat platform and trusted as-is.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod permission;

pub use permission::{PRIVILEGED_COMMANDS, PermissionChecker, PermissionConfig, authorize};

/// Result type for authorization checks.
pub type SecurityResult<T> = Result<T, vishnu_error::SecurityError>;
