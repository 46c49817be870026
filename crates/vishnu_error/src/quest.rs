//! Quest validation and lookup errors.

/// Quest error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QuestErrorKind {
    /// Tier is not in the configured whitelist.
    #[display("Invalid quest tier '{}' (valid tiers: {})", tier, valid.join(", "))]
    InvalidTier {
        /// Tier supplied by the caller
        tier: String,
        /// Configured valid tiers
        valid: Vec<String>,
    },

    /// Description has too many words.
    #[display("Quest description has {} words (limit {})", count, limit)]
    DescriptionTooLong {
        /// Word count of the description
        count: usize,
        /// Word count the description must stay below
        limit: usize,
    },

    /// No quest with this id in the guild.
    #[display("Quest {} not found", _0)]
    NotFound(i32),
}

/// Quest error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Quest Error: {} at line {} in {}", kind, line, file)]
pub struct QuestError {
    /// The kind of error that occurred
    pub kind: QuestErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl QuestError {
    /// Create a new QuestError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: QuestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuestErrorKind {
        &self.kind
    }

    /// Reply text shown to the caller.
    pub fn user_message(&self) -> String {
        match &self.kind {
            QuestErrorKind::InvalidTier { tier, valid } => format!(
                "Error: The quest tier you specified is invalid.\nThe valid quest tiers are: {}.\nYou specified: {}.",
                valid.join(", "),
                tier
            ),
            QuestErrorKind::DescriptionTooLong { count, limit } => format!(
                "Error: Your description is too long.\nThe maximum allowed is {} words.\nYou had: {}",
                limit - 1,
                count
            ),
            QuestErrorKind::NotFound(id) => format!("Error: No quest with ID {} exists.", id),
        }
    }
}
