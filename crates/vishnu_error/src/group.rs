//! Group membership and ownership errors.

/// Group error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GroupErrorKind {
    /// Every slot is taken.
    #[display("Group {} is full ({}/{})", group_id, filled, max)]
    Full {
        /// Group id
        group_id: i32,
        /// Slots taken
        filled: u32,
        /// Total slots
        max: u32,
    },

    /// Caller already belongs to the group (or created it).
    #[display("{} is already a member of group {}", member, group_id)]
    AlreadyMember {
        /// Group id
        group_id: i32,
        /// Caller identity
        member: String,
    },

    /// Caller is not the group's creator.
    #[display("{} is not the owner of group {}", caller, group_id)]
    NotOwner {
        /// Group id
        group_id: i32,
        /// Caller identity
        caller: String,
    },

    /// No group with this id in the guild.
    #[display("Group {} not found", _0)]
    NotFound(i32),

    /// Command must be run inside a group channel.
    #[display("Channel '{}' is not a group channel", _0)]
    NotGroupChannel(String),
}

/// Group error with source location tracking.
///
/// # Examples
///
/// ```
/// use vishnu_error::{GroupError, GroupErrorKind};
///
/// let err = GroupError::new(GroupErrorKind::Full { group_id: 2, filled: 4, max: 4 });
/// assert_eq!(err.user_message(), "Group is already full! (4/4)");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Group Error: {} at line {} in {}", kind, line, file)]
pub struct GroupError {
    /// The kind of error that occurred
    pub kind: GroupErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GroupError {
    /// Create a new GroupError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GroupErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GroupErrorKind {
        &self.kind
    }

    /// Reply text shown to the caller.
    pub fn user_message(&self) -> String {
        match &self.kind {
            GroupErrorKind::Full { filled, max, .. } => {
                format!("Group is already full! ({}/{})", filled, max)
            }
            GroupErrorKind::AlreadyMember { member, .. } => {
                format!("{} is already a member of this group!", member)
            }
            GroupErrorKind::NotOwner { .. } => "You are not the owner of this group!".to_string(),
            GroupErrorKind::NotFound(id) => format!("Error: No group with ID {} exists.", id),
            GroupErrorKind::NotGroupChannel(_) => {
                "Error: Run this command in the group's text channel.".to_string()
            }
        }
    }
}
