//! Kernel error types

use thiserror::Error;

use crate::value::ColumnType;

/// Errors raised while mapping a decoded result row into a record
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The requested column is not part of the row's descriptor
    #[error("column '{0}' missing from result row")]
    MissingColumn(String),

    /// The stored value has a different scalar type than requested
    #[error("column '{column}': expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: ColumnType,
        found: ColumnType,
    },

    /// A non-optional accessor hit a NULL value
    #[error("column '{0}': unexpected NULL")]
    UnexpectedNull(String),
}
