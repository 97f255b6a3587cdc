//! Record descriptors
//!
//! A record descriptor maps a structured value's fields to storage columns,
//! including which columns form the primary key and which are NOT NULL
//! constrained. Descriptors are `const`-buildable so they can live in
//! `static` items and be shared freely; they are the single source of truth
//! for both statement generation and DDL.

use crate::error::DecodeError;
use crate::row::Row;
use crate::value::{ColumnType, Value};

/// One column of a record's table
///
/// Built with a `const` fluent API so descriptors read like the field
/// annotations they replace:
///
/// ```
/// use store_kernel::{ColumnDef, ColumnType, TableDef};
///
/// static BOOKS: TableDef = TableDef::new(
///     "books",
///     &[
///         ColumnDef::new("id", ColumnType::Text).primary_key(),
///         ColumnDef::new("title", ColumnType::Text).not_null(),
///     ],
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub ty: ColumnType,
    pub primary_key: bool,
    pub not_null: bool,
}

impl ColumnDef {
    /// A plain nullable column
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            primary_key: false,
            not_null: false,
        }
    }

    /// Marks the column as (part of) the primary key; implies NOT NULL
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    /// Marks the column as NOT NULL constrained
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// The table shape of a record type
///
/// Declares the table name and its ordered columns. Every descriptor used
/// with key-addressed operations must declare at least one primary-key
/// column; composite keys are simply several columns marked as such.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    pub const fn new(name: &'static str, columns: &'static [ColumnDef]) -> Self {
        Self { name, columns }
    }

    /// Columns forming the primary key, in declaration order
    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.primary_key)
    }

    /// Columns outside the primary key, in declaration order
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.primary_key)
    }

    /// Whether the table declares a primary key at all
    pub fn has_key(&self) -> bool {
        self.key_columns().next().is_some()
    }

    /// Looks up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A record type persistable through the data-access layer
///
/// Implementations connect a Rust struct to its [`TableDef`]:
/// `to_row` serializes the fields into one [`Value`] per declared column (in
/// declaration order), and `from_row` rebuilds the struct from a decoded
/// [`Row`]. Primary-key values are extracted positionally from `to_row`
/// output, so key fields need no separate accessor.
pub trait Record: Send + Sync + Sized {
    /// The table descriptor for this record type
    fn table() -> &'static TableDef;

    /// Serializes the record into one value per column, in column order
    fn to_row(&self) -> Vec<Value>;

    /// Rebuilds a record from a decoded result row
    fn from_row(row: &Row) -> Result<Self, DecodeError>;
}
