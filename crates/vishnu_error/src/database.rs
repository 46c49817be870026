//! Record store error types.

/// Record store error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// No connection could be checked out of the pool
    #[display("Connection pool error: {}", _0)]
    Pool(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
    /// Stored row could not be turned into a record
    #[display("Corrupt row: {}", _0)]
    CorruptRow(String),
    /// Blocking task panicked or was cancelled
    #[display("Store task failed: {}", _0)]
    Task(String),
    /// Operation exceeded its deadline
    #[display("Store operation '{}' timed out after {}ms", operation, millis)]
    Timeout {
        /// Store operation name
        operation: String,
        /// Deadline in milliseconds
        millis: u64,
    },
}

impl DatabaseErrorKind {
    /// Whether the store was unreachable, as opposed to rejecting the request.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Pool(_))
    }
}

/// Record store error with source location tracking.
///
/// # Examples
///
/// ```
/// use vishnu_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::Pool("timed out".to_string()));
/// assert!(err.kind.is_unavailable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
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
            DatabaseErrorKind::Timeout { .. } => {
                "Error: The quest database took too long to answer. Please try again.".to_string()
            }
            kind if kind.is_unavailable() => {
                "Error: The quest database is unavailable right now. Please try again later."
                    .to_string()
            }
            _ => "Error: The quest database could not complete that request.".to_string(),
        }
    }
}

// Diesel error conversions (only available with database feature)
#[cfg(feature = "database")]
impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ClosedConnection,
                info,
            ) => DatabaseError::new(DatabaseErrorKind::Connection(info.message().to_string())),
            _ => DatabaseError::new(DatabaseErrorKind::Query(err.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::r2d2::PoolError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::r2d2::PoolError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Pool(err.to_string()))
    }
}
