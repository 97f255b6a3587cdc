//! Scalar values exchanged with the storage engine
//!
//! The data-access layer is agnostic to concrete record field types; it only
//! requires that every field serializes to one of a closed set of column
//! scalars. [`ColumnType`] names that set and doubles as the DDL source of
//! truth, while [`Value`] carries the actual data for binding and decoding.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Column scalar types understood by the data-access layer
///
/// Record descriptors declare one of these per column. The schema manager
/// renders them to dialect-specific SQL type names, and the executor uses
/// them to drive result-row decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// True/false flag
    Boolean,
    /// 64-bit signed integer
    BigInt,
    /// 64-bit floating point number
    Double,
    /// Variable-length UTF-8 text
    Text,
    /// Raw byte string
    Binary,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "boolean",
            ColumnType::BigInt => "bigint",
            ColumnType::Double => "double",
            ColumnType::Text => "text",
            ColumnType::Binary => "binary",
        };
        f.write_str(name)
    }
}

/// A typed scalar bound to, or decoded from, a storage column
///
/// Every variant wraps an `Option` so that NULL keeps a concrete wire type:
/// a nullable bigint column binds `BigInt(None)` rather than an untyped NULL,
/// which matters for engines that type-check prepared-statement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Boolean(Option<bool>),
    BigInt(Option<i64>),
    Double(Option<f64>),
    Text(Option<String>),
    Binary(Option<Vec<u8>>),
}

impl Value {
    /// A NULL of the given column type
    pub fn null(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Boolean => Value::Boolean(None),
            ColumnType::BigInt => Value::BigInt(None),
            ColumnType::Double => Value::Double(None),
            ColumnType::Text => Value::Text(None),
            ColumnType::Binary => Value::Binary(None),
        }
    }

    /// Whether this value is NULL (of any type)
    pub fn is_null(&self) -> bool {
        match self {
            Value::Boolean(v) => v.is_none(),
            Value::BigInt(v) => v.is_none(),
            Value::Double(v) => v.is_none(),
            Value::Text(v) => v.is_none(),
            Value::Binary(v) => v.is_none(),
        }
    }

    /// The column type this value binds as
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Boolean(_) => ColumnType::Boolean,
            Value::BigInt(_) => ColumnType::BigInt,
            Value::Double(_) => ColumnType::Double,
            Value::Text(_) => ColumnType::Text,
            Value::Binary(_) => ColumnType::Binary,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(Some(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(Some(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::BigInt(Some(i64::from(v)))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(Some(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(Some(v.to_string()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(Some(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Binary(Some(v))
    }
}

impl From<Option<bool>> for Value {
    fn from(v: Option<bool>) -> Self {
        Value::Boolean(v)
    }
}

impl From<Option<i64>> for Value {
    fn from(v: Option<i64>) -> Self {
        Value::BigInt(v)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        Value::Double(v)
    }
}

impl From<Option<String>> for Value {
    fn from(v: Option<String>) -> Self {
        Value::Text(v)
    }
}

impl From<Option<Vec<u8>>> for Value {
    fn from(v: Option<Vec<u8>>) -> Self {
        Value::Binary(v)
    }
}
