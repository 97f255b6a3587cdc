//! Transactional schema management
//!
//! The schema manager creates, drops, and recreates groups of tables as
//! single atomic operations: each call runs every DDL statement inside one
//! transaction and rolls everything back if any statement fails, so no
//! partial schema state is ever observable.
//!
//! Table groups are given as two ordered lists: primary record types and
//! intermediary (join/dependent) record types. Registration records
//! intermediary descriptors before primary ones (relation targets first),
//! while the create and drop paths operate on the flat concatenation of
//! primary then intermediary, in that order.

use store_kernel::{sql, TableDef};
use tracing::info;

use crate::error::StoreError;
use crate::executor::Executor;
use crate::pool::Store;
use crate::transaction::run_in_transaction;

/// Transactional DDL over groups of record descriptors
#[derive(Debug, Clone)]
pub struct SchemaManager {
    store: Store,
    registry: Vec<&'static TableDef>,
}

impl SchemaManager {
    /// Creates a schema manager over the given store
    pub fn new(store: Store) -> Self {
        Self {
            store,
            registry: Vec::new(),
        }
    }

    /// Declares the record shapes this manager works with
    ///
    /// Intermediary descriptors are registered before primary ones, since
    /// primary tables typically reference them. Re-registering a table name
    /// replaces the earlier descriptor in place.
    pub fn register_record_types(
        &mut self,
        primary: &[&'static TableDef],
        intermediary: &[&'static TableDef],
    ) {
        for table in intermediary.iter().chain(primary.iter()) {
            match self.registry.iter().position(|t| t.name == table.name) {
                Some(index) => self.registry[index] = table,
                None => self.registry.push(table),
            }
        }
    }

    /// The registered descriptors, in registration order
    pub fn registered(&self) -> &[&'static TableDef] {
        &self.registry
    }

    /// Creates every table in `primary` followed by `intermediary`, atomically
    ///
    /// Any single failure rolls back all creations; the underlying cause is
    /// kept inside [`StoreError::CreateTablesFailed`].
    pub async fn create_tables(
        &self,
        primary: &[&'static TableDef],
        intermediary: &[&'static TableDef],
    ) -> Result<(), StoreError> {
        let tables = combined(primary, intermediary);
        info!(count = tables.len(), "creating tables");

        run_in_transaction(&self.store, move |scope| {
            Box::pin(async move {
                for table in tables {
                    let statement = sql::render_create_table(table, false, scope.dialect());
                    scope.execute(statement).await?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|error| StoreError::CreateTablesFailed {
            source: Box::new(error),
        })
    }

    /// Drops every table in the combined list, atomically
    ///
    /// Each drop is `IF EXISTS` (a table's prior absence is not an error)
    /// and cascades to dependent objects where the dialect supports it. Any
    /// real failure rolls the whole operation back inside
    /// [`StoreError::DropTablesFailed`].
    pub async fn drop_tables(
        &self,
        primary: &[&'static TableDef],
        intermediary: &[&'static TableDef],
    ) -> Result<(), StoreError> {
        let tables = combined(primary, intermediary);
        info!(count = tables.len(), "dropping tables");

        run_in_transaction(&self.store, move |scope| {
            Box::pin(async move {
                for table in tables {
                    let statement = sql::render_drop_table(table, scope.dialect());
                    scope.execute(statement).await?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|error| StoreError::DropTablesFailed {
            source: Box::new(error),
        })
    }

    /// Drops then recreates every table in the combined list, atomically
    ///
    /// Either phase failing rolls back the entire operation, leaving the
    /// schema exactly as before the call. Data is not preserved across the
    /// drop.
    pub async fn drop_and_create_tables(
        &self,
        primary: &[&'static TableDef],
        intermediary: &[&'static TableDef],
    ) -> Result<(), StoreError> {
        let tables = combined(primary, intermediary);
        info!(count = tables.len(), "dropping and recreating tables");

        run_in_transaction(&self.store, move |scope| {
            Box::pin(async move {
                for table in tables.iter().copied() {
                    let statement = sql::render_drop_table(table, scope.dialect());
                    scope.execute(statement).await?;
                }
                for table in tables.iter().copied() {
                    let statement = sql::render_create_table(table, false, scope.dialect());
                    scope.execute(statement).await?;
                }
                Ok(())
            })
        })
        .await
        .map_err(|error| StoreError::DropCreateTablesFailed {
            source: Box::new(error),
        })
    }

    /// Creates a named index on one column, in its own transaction
    pub async fn create_index(
        &self,
        table: &'static TableDef,
        index_name: &str,
        column: &str,
    ) -> Result<(), StoreError> {
        if table.column(column).is_none() {
            return Err(StoreError::InvalidDescriptor(format!(
                "{}: no column '{}' to index",
                table.name, column
            )));
        }

        info!(table = table.name, index = index_name, "creating index");
        let statement = sql::render_create_index(
            table,
            index_name,
            column,
            self.store.driver().dialect(),
        );

        run_in_transaction(&self.store, move |scope| {
            Box::pin(async move {
                scope.execute(statement).await?;
                Ok(())
            })
        })
        .await
    }
}

fn combined(
    primary: &[&'static TableDef],
    intermediary: &[&'static TableDef],
) -> Vec<&'static TableDef> {
    primary.iter().chain(intermediary.iter()).copied().collect()
}
