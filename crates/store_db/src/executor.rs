//! The executor capability
//!
//! Every repository and schema operation runs against an [`Executor`]: either
//! a plain [`Store`] (statements go straight to the pool) or an open
//! [`TransactionScope`]. The capability hides which of the two it is, so the
//! same operation code participates in transactions without change.

use async_trait::async_trait;
use sqlx::any::{Any, AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::Row as _;
use store_kernel::{ColumnType, Dialect, Row, Statement, TableDef, Value};
use tracing::debug;

use crate::error::StoreError;
use crate::pool::Store;

/// The capability statements run against
///
/// Implemented by [`Store`] and [`TransactionScope`]; repository operations
/// accept `&mut dyn Executor` and stay agnostic to transaction scoping.
#[async_trait]
pub trait Executor: Send {
    /// The SQL dialect statements must be rendered in
    fn dialect(&self) -> Dialect;

    /// Runs a statement, returning the number of affected rows
    async fn execute(&mut self, statement: Statement) -> Result<u64, StoreError>;

    /// Runs a query, decoding every result row against the descriptor
    async fn fetch_all(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Vec<Row>, StoreError>;

    /// Runs a query, decoding at most one result row
    async fn fetch_optional(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Option<Row>, StoreError>;
}

fn bind_params(sql: &str, params: Vec<Value>) -> Query<'_, Any, AnyArguments<'_>> {
    let mut query = sqlx::query::<Any>(sql);
    for value in params {
        query = match value {
            Value::Boolean(v) => query.bind(v),
            Value::BigInt(v) => query.bind(v),
            Value::Double(v) => query.bind(v),
            Value::Text(v) => query.bind(v),
            Value::Binary(v) => query.bind(v),
        };
    }
    query
}

/// Decodes an engine row into a kernel row, driven by the descriptor's
/// column types; columns are read positionally in declaration order.
fn decode_row(row: &AnyRow, table: &'static TableDef) -> Result<Row, StoreError> {
    let mut values = Vec::with_capacity(table.columns.len());
    for (index, column) in table.columns.iter().enumerate() {
        let value = match column.ty {
            ColumnType::Boolean => Value::Boolean(row.try_get(index)?),
            ColumnType::BigInt => Value::BigInt(row.try_get(index)?),
            ColumnType::Double => Value::Double(row.try_get(index)?),
            ColumnType::Text => Value::Text(row.try_get(index)?),
            ColumnType::Binary => Value::Binary(row.try_get(index)?),
        };
        values.push(value);
    }
    Ok(Row::new(table.columns, values))
}

fn log_statement(enabled: bool, statement: &Statement) {
    if enabled {
        debug!(sql = %statement.sql, params = statement.params.len(), "executing statement");
    }
}

#[async_trait]
impl Executor for Store {
    fn dialect(&self) -> Dialect {
        self.driver().dialect()
    }

    async fn execute(&mut self, statement: Statement) -> Result<u64, StoreError> {
        log_statement(self.log_queries_enabled(), &statement);
        let Statement { sql, params } = statement;
        let result = bind_params(&sql, params).execute(self.pool()).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Vec<Row>, StoreError> {
        log_statement(self.log_queries_enabled(), &statement);
        let Statement { sql, params } = statement;
        let rows = bind_params(&sql, params).fetch_all(self.pool()).await?;
        rows.iter().map(|row| decode_row(row, table)).collect()
    }

    async fn fetch_optional(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Option<Row>, StoreError> {
        log_statement(self.log_queries_enabled(), &statement);
        let Statement { sql, params } = statement;
        let row = bind_params(&sql, params)
            .fetch_optional(self.pool())
            .await?;
        row.as_ref().map(|row| decode_row(row, table)).transpose()
    }
}

/// An open unit of work
///
/// Created by [`run_in_transaction`](crate::transaction::run_in_transaction)
/// and handed to the unit-of-work closure; all statements executed through it
/// commit or roll back together. The scope must not outlive its unit of
/// work, and a unit of work must not open a second top-level transaction on
/// the scope's underlying store.
pub struct TransactionScope {
    tx: sqlx::Transaction<'static, Any>,
    dialect: Dialect,
    log_queries: bool,
}

impl TransactionScope {
    pub(crate) async fn begin(store: &Store) -> Result<Self, StoreError> {
        let tx = store.pool().begin().await?;
        Ok(Self {
            tx,
            dialect: store.driver().dialect(),
            log_queries: store.log_queries_enabled(),
        })
    }

    pub(crate) async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(StoreError::from)
    }

    pub(crate) async fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(StoreError::from)
    }
}

#[async_trait]
impl Executor for TransactionScope {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn execute(&mut self, statement: Statement) -> Result<u64, StoreError> {
        log_statement(self.log_queries, &statement);
        let Statement { sql, params } = statement;
        let result = bind_params(&sql, params).execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn fetch_all(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Vec<Row>, StoreError> {
        log_statement(self.log_queries, &statement);
        let Statement { sql, params } = statement;
        let rows = bind_params(&sql, params).fetch_all(&mut *self.tx).await?;
        rows.iter().map(|row| decode_row(row, table)).collect()
    }

    async fn fetch_optional(
        &mut self,
        statement: Statement,
        table: &'static TableDef,
    ) -> Result<Option<Row>, StoreError> {
        log_statement(self.log_queries, &statement);
        let Statement { sql, params } = statement;
        let row = bind_params(&sql, params)
            .fetch_optional(&mut *self.tx)
            .await?;
        row.as_ref().map(|row| decode_row(row, table)).transpose()
    }
}
