//! Store error types
//!
//! This module defines the error taxonomy for all repository and schema
//! operations, mapping engine-level failures onto a small, stable set of
//! variants without discarding the underlying cause.

use sqlx::error::ErrorKind;
use store_kernel::DecodeError;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Zero rows matched where exactly one was required
    #[error("no rows matched where exactly one was required")]
    NotFound,

    /// Unique/primary-key violation on an insert without duplicate suppression
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Not-null, check, or foreign-key integrity failure
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Failed to open or validate a store connection
    #[error("failed to connect to store: {0}")]
    ConnectionFailed(String),

    /// A record descriptor breached its contract (no key, arity mismatch)
    #[error("invalid record descriptor: {0}")]
    InvalidDescriptor(String),

    /// A result row could not be mapped back into a record
    #[error("row decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// The engine returned something outside its contract (e.g. more rows
    /// than the statement's limit allows)
    #[error("driver contract violation: {0}")]
    DriverContract(String),

    /// Opaque engine-level failure
    #[error("statement execution failed: {0}")]
    ExecutionFailure(#[source] sqlx::Error),

    /// A create-tables transaction failed and was rolled back
    #[error("create tables failed: {source}")]
    CreateTablesFailed {
        #[source]
        source: Box<StoreError>,
    },

    /// A drop-tables transaction failed and was rolled back
    #[error("drop tables failed: {source}")]
    DropTablesFailed {
        #[source]
        source: Box<StoreError>,
    },

    /// A drop-and-create transaction failed and was rolled back
    #[error("drop and create tables failed: {source}")]
    DropCreateTablesFailed {
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Whether this error means no row matched a single-row fetch
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }

    /// Whether this error is a unique/primary-key conflict
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, StoreError::DuplicateKey(_))
    }

    /// Whether this error is any integrity-constraint failure
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateKey(_) | StoreError::ConstraintViolation(_)
        )
    }
}

/// Classifies engine errors into the store taxonomy
///
/// Uses the driver-neutral error kind rather than engine-specific codes, so
/// the same mapping holds for the embedded and networked backends.
impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let message = db_error.message().to_string();
            match db_error.kind() {
                ErrorKind::UniqueViolation => return StoreError::DuplicateKey(message),
                ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::ConstraintViolation(message);
                }
                _ => {}
            }
        }
        if matches!(error, sqlx::Error::RowNotFound) {
            return StoreError::NotFound;
        }
        StoreError::ExecutionFailure(error)
    }
}
