//! Authorization error types.

/// Authorization error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SecurityErrorKind {
    /// Caller holds none of the whitelisted roles.
    #[display("Permission denied for command '{}': {}", command, reason)]
    PermissionDenied {
        /// Command that was denied
        command: String,
        /// Reason for denial
        reason: String,
    },

    /// Command issued outside the channel whitelist.
    #[display("Channel {} is not whitelisted", _0)]
    ChannelNotAllowed(u64),
}

/// Authorization error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Security Error: {} at line {} in {}", kind, line, file)]
pub struct SecurityError {
    /// The kind of error that occurred
    pub kind: SecurityErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SecurityError {
    /// Create a new SecurityError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SecurityErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Reply text shown to the caller.
    pub fn user_message(&self) -> String {
        match &self.kind {
            SecurityErrorKind::PermissionDenied { command, .. } => {
                format!("Error: You do not have a role that may run `{}`.", command)
            }
            SecurityErrorKind::ChannelNotAllowed(_) => {
                "Error: Commands are not accepted in this channel.".to_string()
            }
        }
    }
}
