//! Top-level error wrapper types.

use crate::{
    ConfigError, DatabaseError, GroupError, ParseError, PlatformError, QuestError,
    RetryableError, SecurityError,
};

/// Every error condition the bot can hit while serving a command.
///
/// # Examples
///
/// ```
/// use vishnu_error::{QuestError, QuestErrorKind, VishnuError};
///
/// let err: VishnuError = QuestError::new(QuestErrorKind::NotFound(7)).into();
/// assert!(format!("{}", err).contains("Quest 7 not found"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VishnuErrorKind {
    /// Malformed dice token, filter or argument
    #[from(ParseError)]
    Parse(ParseError),
    /// Quest validation or lookup failure
    #[from(QuestError)]
    Quest(QuestError),
    /// Group membership or ownership failure
    #[from(GroupError)]
    Group(GroupError),
    /// Caller not authorized
    #[from(SecurityError)]
    Security(SecurityError),
    /// Record store failure
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Chat platform side effect failure
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Vishnu error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vishnu_error::{ConfigError, VishnuResult};
///
/// fn load() -> VishnuResult<()> {
///     Err(ConfigError::new("missing quest_tiers"))?
/// }
///
/// assert!(load().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vishnu Error: {}", _0)]
pub struct VishnuError(Box<VishnuErrorKind>);

impl VishnuError {
    /// Create a new error from a kind.
    pub fn new(kind: VishnuErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VishnuErrorKind {
        &self.0
    }

    /// Reply text shown to the person who issued the command.
    pub fn user_message(&self) -> String {
        match self.kind() {
            VishnuErrorKind::Parse(e) => e.user_message(),
            VishnuErrorKind::Quest(e) => e.user_message(),
            VishnuErrorKind::Group(e) => e.user_message(),
            VishnuErrorKind::Security(e) => e.user_message(),
            VishnuErrorKind::Database(e) => e.user_message(),
            VishnuErrorKind::Platform(e) => e.user_message(),
            VishnuErrorKind::Config(_) => {
                "Error: The bot is misconfigured; please tell an administrator.".to_string()
            }
        }
    }
}

impl RetryableError for VishnuError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            VishnuErrorKind::Database(e) => e.is_retryable(),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to VishnuErrorKind
impl<T> From<T> for VishnuError
where
    T: Into<VishnuErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

#[cfg(feature = "database")]
impl From<diesel::result::Error> for VishnuErrorKind {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        VishnuErrorKind::Database(DatabaseError::from(err))
    }
}

/// Result type for Vishnu operations.
pub type VishnuResult<T> = std::result::Result<T, VishnuError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatabaseErrorKind, GroupErrorKind, QuestErrorKind, SecurityErrorKind};

    #[test]
    fn test_invalid_tier_message_lists_valid_tiers() {
        let err: VishnuError = QuestError::new(QuestErrorKind::InvalidTier {
            tier: "9".to_string(),
            valid: vec!["1".to_string(), "2".to_string(), "3".to_string()],
        })
        .into();

        let message = err.user_message();
        assert!(message.contains("The valid quest tiers are: 1, 2, 3."));
        assert!(message.contains("You specified: 9."));
    }

    #[test]
    fn test_description_too_long_reports_count() {
        let err: VishnuError = QuestError::new(QuestErrorKind::DescriptionTooLong {
            count: 120,
            limit: 100,
        })
        .into();

        assert!(err.user_message().contains("You had: 120"));
    }

    #[test]
    fn test_only_unavailable_store_errors_retry() {
        let unavailable: VishnuError =
            DatabaseError::new(DatabaseErrorKind::Pool("exhausted".to_string())).into();
        let timeout: VishnuError = DatabaseError::new(DatabaseErrorKind::Timeout {
            operation: "list_quests".to_string(),
            millis: 5000,
        })
        .into();
        let full: VishnuError = GroupError::new(GroupErrorKind::Full {
            group_id: 1,
            filled: 1,
            max: 1,
        })
        .into();

        assert!(unavailable.is_retryable());
        assert!(!timeout.is_retryable());
        assert!(!full.is_retryable());
    }

    #[test]
    fn test_location_is_captured() {
        let err = SecurityError::new(SecurityErrorKind::ChannelNotAllowed(42));
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
    }
}
