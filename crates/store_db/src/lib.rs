//! Store DB - sqlx-backed infrastructure of the store data-access stack
//!
//! This crate turns the pure contracts of [`store_kernel`] into working data
//! access over SQLite or PostgreSQL:
//!
//! - [`Store`] / [`StoreConfig`]: pooled connection management for the
//!   closed set of supported drivers
//! - [`Executor`]: the capability statements run against, a plain store or
//!   an open [`TransactionScope`] interchangeably
//! - [`repository`]: generic CRUD, pagination, and upsert for any
//!   [`Record`](store_kernel::Record) type
//! - [`run_in_transaction`]: commit-or-rollback units of work
//! - [`SchemaManager`]: atomic create/drop/recreate of table groups
//!
//! # Example
//!
//! ```rust,ignore
//! use store_db::{repository, DriverKind, Store};
//!
//! let mut store = Store::connect(DriverKind::Sqlite, "sqlite:app.db", 5, false).await?;
//! repository::create(&mut store, &book, false).await?;
//! ```

pub mod error;
pub mod executor;
pub mod pool;
pub mod repository;
pub mod schema;
pub mod transaction;

pub use error::StoreError;
pub use executor::{Executor, TransactionScope};
pub use pool::{DriverKind, Store, StoreConfig};
pub use repository::Page;
pub use schema::SchemaManager;
pub use transaction::{run_in_transaction, UnitOfWork};
