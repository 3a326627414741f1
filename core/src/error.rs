use thiserror::Error;

/// Result type alias for TODO operations
pub type Result<T> = std::result::Result<T, TodoError>;

/// Error taxonomy for the TODO service.
///
/// The service raises `NotFound`, `ConstraintViolation`, `Database` and
/// `Cancelled`; the boundary layer raises `Validation` before the service is
/// ever invoked. Each variant maps to one HTTP status code.
///
/// # Examples
///
/// ```rust
/// use todo_core::error::TodoError;
///
/// let not_found = TodoError::not_found_id(42);
/// assert!(not_found.is_not_found());
/// assert_eq!(not_found.status_code(), 404);
///
/// let empty = TodoError::empty_subject();
/// assert!(empty.is_constraint_violation());
/// assert_eq!(empty.status_code(), 400);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Target entity does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request violates a store-level invariant
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Caller-side validation failed before reaching the service
    #[error("Validation error: {0}")]
    Validation(String),

    /// Opaque persistence or connectivity failure
    #[error("Database error: {0}")]
    Database(String),

    /// The caller cancelled the operation before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TodoError {
    /// Create a not found error for a TODO ID
    pub fn not_found_id(id: i64) -> Self {
        Self::NotFound(format!("TODO with ID {id} not found"))
    }

    /// Create a not found error for a bulk delete that matched nothing
    pub fn none_deleted(ids: &[i64]) -> Self {
        Self::NotFound(format!("None of the {} requested TODOs exist", ids.len()))
    }

    /// Constraint violation raised when an update carries an empty subject
    pub fn empty_subject() -> Self {
        Self::ConstraintViolation("subject must not be empty".to_string())
    }

    /// Create a validation error for empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    /// Create a validation error for a query or body field that failed to parse
    pub fn invalid_field(field: &str, reason: impl std::fmt::Display) -> Self {
        Self::Validation(format!("Field '{field}' is invalid: {reason}"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TodoError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, TodoError::ConstraintViolation(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TodoError::Validation(_))
    }

    pub fn is_database(&self) -> bool {
        matches!(self, TodoError::Database(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TodoError::Cancelled)
    }

    /// Convert to appropriate HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            TodoError::NotFound(_) => 404,
            TodoError::ConstraintViolation(_) => 400,
            TodoError::Validation(_) => 400,
            TodoError::Database(_) => 500,
            TodoError::Cancelled => 500,
            TodoError::Configuration(_) => 500,
            TodoError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = TodoError::not_found_id(42);
        assert_eq!(error, TodoError::NotFound("TODO with ID 42 not found".to_string()));
        assert!(error.is_not_found());
        assert_eq!(error.status_code(), 404);

        let error = TodoError::none_deleted(&[1, 2, 3]);
        assert!(error.is_not_found());
        assert_eq!(format!("{error}"), "Resource not found: None of the 3 requested TODOs exist");

        let error = TodoError::empty_subject();
        assert!(error.is_constraint_violation());
        assert_eq!(error.status_code(), 400);

        let error = TodoError::invalid_field("size", "not a number");
        assert!(error.is_validation());
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_error_display() {
        let error = TodoError::Validation("Invalid input".to_string());
        assert_eq!(format!("{}", error), "Validation error: Invalid input");

        let error = TodoError::Cancelled;
        assert_eq!(format!("{}", error), "Operation cancelled");

        let error = TodoError::empty_field("subject");
        assert_eq!(format!("{}", error), "Validation error: Field 'subject' cannot be empty");
    }

    #[test]
    fn test_database_errors_are_not_not_found() {
        let error = TodoError::Database("disk I/O error".to_string());
        assert!(error.is_database());
        assert!(!error.is_not_found());
        assert_eq!(error.status_code(), 500);

        assert!(TodoError::Cancelled.is_cancelled());
        assert!(!TodoError::Cancelled.is_database());
        assert_eq!(TodoError::Cancelled.status_code(), 500);
    }
}
