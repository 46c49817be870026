//! Chat platform side-effect errors.

/// Chat platform error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Role creation, assignment or deletion failed.
    #[display("Role operation failed for '{}': {}", role, reason)]
    Role {
        /// Role name
        role: String,
        /// Underlying failure
        reason: String,
    },

    /// Channel creation or deletion failed.
    #[display("Channel operation failed for '{}': {}", channel, reason)]
    Channel {
        /// Channel name
        channel: String,
        /// Underlying failure
        reason: String,
    },

    /// Message could not be delivered.
    #[display("Message send failed: {}", _0)]
    MessageSendFailed(String),

    /// A platform id was zero or otherwise unusable.
    #[display("Invalid {} id", _0)]
    InvalidId(String),

    /// Connection to the chat gateway failed.
    #[display("Connection failed: {}", _0)]
    ConnectionFailed(String),
}

/// Chat platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// The kind of error that occurred
    pub kind: PlatformErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Reply text shown to the caller.
    pub fn user_message(&self) -> String {
        format!("Error: {}.", self.kind)
    }
}
