//! Decoded result rows
//!
//! The executor decodes every engine row into a [`Row`]: the record's column
//! metadata plus one [`Value`] per column. Record implementations read their
//! fields back out through the typed accessors, which report missing columns,
//! type mismatches, and unexpected NULLs as [`DecodeError`]s instead of
//! panicking.

use crate::error::DecodeError;
use crate::record::ColumnDef;
use crate::value::{ColumnType, Value};

/// One decoded result row, aligned with a record's column descriptors
#[derive(Debug, Clone)]
pub struct Row {
    columns: &'static [ColumnDef],
    values: Vec<Value>,
}

impl Row {
    /// Pairs decoded values with their column descriptors
    ///
    /// The executor guarantees one value per column; the arity check is a
    /// debug guard against a miswired decoder.
    pub fn new(columns: &'static [ColumnDef], values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// The raw value of a column
    pub fn value(&self, column: &str) -> Result<&Value, DecodeError> {
        self.columns
            .iter()
            .position(|c| c.name == column)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| DecodeError::MissingColumn(column.to_string()))
    }

    fn typed(&self, column: &str, expected: ColumnType) -> Result<&Value, DecodeError> {
        let value = self.value(column)?;
        if value.column_type() != expected {
            return Err(DecodeError::TypeMismatch {
                column: column.to_string(),
                expected,
                found: value.column_type(),
            });
        }
        Ok(value)
    }

    pub fn opt_text(&self, column: &str) -> Result<Option<String>, DecodeError> {
        match self.typed(column, ColumnType::Text)? {
            Value::Text(v) => Ok(v.clone()),
            _ => unreachable!(),
        }
    }

    pub fn text(&self, column: &str) -> Result<String, DecodeError> {
        self.opt_text(column)?
            .ok_or_else(|| DecodeError::UnexpectedNull(column.to_string()))
    }

    pub fn opt_big_int(&self, column: &str) -> Result<Option<i64>, DecodeError> {
        match self.typed(column, ColumnType::BigInt)? {
            Value::BigInt(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    pub fn big_int(&self, column: &str) -> Result<i64, DecodeError> {
        self.opt_big_int(column)?
            .ok_or_else(|| DecodeError::UnexpectedNull(column.to_string()))
    }

    pub fn opt_double(&self, column: &str) -> Result<Option<f64>, DecodeError> {
        match self.typed(column, ColumnType::Double)? {
            Value::Double(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    pub fn double(&self, column: &str) -> Result<f64, DecodeError> {
        self.opt_double(column)?
            .ok_or_else(|| DecodeError::UnexpectedNull(column.to_string()))
    }

    pub fn opt_boolean(&self, column: &str) -> Result<Option<bool>, DecodeError> {
        match self.typed(column, ColumnType::Boolean)? {
            Value::Boolean(v) => Ok(*v),
            _ => unreachable!(),
        }
    }

    pub fn boolean(&self, column: &str) -> Result<bool, DecodeError> {
        self.opt_boolean(column)?
            .ok_or_else(|| DecodeError::UnexpectedNull(column.to_string()))
    }

    pub fn opt_binary(&self, column: &str) -> Result<Option<Vec<u8>>, DecodeError> {
        match self.typed(column, ColumnType::Binary)? {
            Value::Binary(v) => Ok(v.clone()),
            _ => unreachable!(),
        }
    }

    pub fn binary(&self, column: &str) -> Result<Vec<u8>, DecodeError> {
        self.opt_binary(column)?
            .ok_or_else(|| DecodeError::UnexpectedNull(column.to_string()))
    }
}
