//! Store Kernel - contract layer of the store data-access stack
//!
//! This crate defines everything the repository and schema layers agree on
//! without touching a database driver:
//! - Record descriptors ([`TableDef`], [`ColumnDef`], the [`Record`] trait)
//! - Scalar [`Value`]s and decoded [`Row`]s
//! - Composable [`criteria`] over select/update/delete query shapes
//! - Dialect-aware SQL rendering ([`sql`])
//!
//! The descriptor surface is the persisted schema contract: the same
//! primary-key / not-null markers drive statement generation and DDL, so
//! they must remain stable for a given record type.

pub mod criteria;
pub mod error;
pub mod record;
pub mod row;
pub mod sql;
pub mod value;

pub use criteria::{
    eq, gt, gte, in_list, is_not_null, is_null, like, lt, lte, ne, Cond, DeleteCriteria,
    DeleteQuery, SelectCriteria, SelectQuery, SortOrder, UpdateCriteria, UpdateQuery,
};
pub use error::DecodeError;
pub use record::{ColumnDef, Record, TableDef};
pub use row::Row;
pub use sql::{quote_ident, Dialect, OnConflict, Statement};
pub use value::{ColumnType, Value};
