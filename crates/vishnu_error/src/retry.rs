//! Retry classification.

/// Trait for errors that can be retried.
///
/// Implemented by error types that know whether a failed operation is worth
/// attempting again. Store callers consult it before backing off.
///
/// # Example
///
/// ```
/// use vishnu_error::{DatabaseError, DatabaseErrorKind, RetryableError, VishnuError};
///
/// let err: VishnuError = DatabaseError::new(DatabaseErrorKind::Connection("reset".into())).into();
/// assert!(err.is_retryable());
///
/// let err: VishnuError = DatabaseError::new(DatabaseErrorKind::Query("syntax".into())).into();
/// assert!(!err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for crate::DatabaseError {
    fn is_retryable(&self) -> bool {
        self.kind.is_unavailable()
    }
}
