//! Generic repository operations
//!
//! Stateless CRUD, pagination, and upsert over any [`Record`] type. Every
//! operation is parameterized per call by an [`Executor`] (a plain store or
//! an open transaction scope) and holds no state of its own, so the same
//! functions are safe for concurrent callers sharing one store.
//!
//! Criteria slices are applied left to right; the empty slice means "no
//! additional predicate", which for the `*_where` update/delete operations
//! means the statement touches every row of the table.

use store_kernel::sql::{self, OnConflict};
use store_kernel::{
    eq, ColumnDef, DeleteCriteria, DeleteQuery, Record, SelectCriteria, SelectQuery, TableDef,
    UpdateCriteria, UpdateQuery, Value,
};

use crate::error::StoreError;
use crate::executor::Executor;

/// One page of records plus the flag for rows beyond it
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub has_more: bool,
}

fn checked_row<T: Record>(record: &T) -> Result<Vec<Value>, StoreError> {
    let table = T::table();
    let row = record.to_row();
    if row.len() != table.columns.len() {
        return Err(StoreError::InvalidDescriptor(format!(
            "{}: to_row produced {} values for {} declared columns",
            table.name,
            row.len(),
            table.columns.len()
        )));
    }
    Ok(row)
}

fn checked_rows<T: Record>(records: &[T]) -> Result<Vec<Vec<Value>>, StoreError> {
    records.iter().map(checked_row).collect()
}

fn require_key(table: &'static TableDef) -> Result<(), StoreError> {
    if !table.has_key() {
        return Err(StoreError::InvalidDescriptor(format!(
            "{}: no primary-key column declared",
            table.name
        )));
    }
    Ok(())
}

/// Pairs the table's key columns with the row's key values
fn key_values<'a>(
    table: &'static TableDef,
    row: &'a [Value],
) -> impl Iterator<Item = (&'static ColumnDef, &'a Value)> {
    table
        .columns
        .iter()
        .zip(row.iter())
        .filter(|(column, _)| column.primary_key)
}

/// Inserts one record
///
/// With `ignore_duplicates`, a unique/primary-key conflict is suppressed at
/// the statement level: the call succeeds, but success does **not** imply
/// the row now exists with the given values; an existing conflicting row is
/// left untouched. Without it, a conflict fails with
/// [`StoreError::DuplicateKey`].
pub async fn create<T: Record>(
    exec: &mut dyn Executor,
    record: &T,
    ignore_duplicates: bool,
) -> Result<(), StoreError> {
    let row = checked_row(record)?;
    let on_conflict = if ignore_duplicates {
        OnConflict::Ignore
    } else {
        OnConflict::Error
    };
    let statement = sql::render_insert(T::table(), &[row], on_conflict, exec.dialect());
    exec.execute(statement).await?;
    Ok(())
}

/// Inserts a batch of records as one multi-row statement
///
/// Duplicate handling matches [`create`]; an empty batch is a no-op.
pub async fn create_many<T: Record>(
    exec: &mut dyn Executor,
    records: &[T],
    ignore_duplicates: bool,
) -> Result<(), StoreError> {
    if records.is_empty() {
        return Ok(());
    }
    let rows = checked_rows(records)?;
    let on_conflict = if ignore_duplicates {
        OnConflict::Ignore
    } else {
        OnConflict::Error
    };
    let statement = sql::render_insert(T::table(), &rows, on_conflict, exec.dialect());
    exec.execute(statement).await?;
    Ok(())
}

/// Fetches exactly one record matched by its own primary-key value(s)
///
/// The record is repopulated in place from the stored row. Fails with
/// [`StoreError::NotFound`] when no row matches.
pub async fn select_one_by_pk<T: Record>(
    exec: &mut dyn Executor,
    record: &mut T,
) -> Result<(), StoreError> {
    let table = T::table();
    require_key(table)?;
    let row = checked_row(record)?;

    let mut query = SelectQuery::new(table);
    for (column, value) in key_values(table, &row) {
        query = query.filter(eq(column.name, value.clone()));
    }

    let statement = sql::render_select(query.limit(1), exec.dialect());
    let fetched = exec
        .fetch_optional(statement, table)
        .await?
        .ok_or(StoreError::NotFound)?;
    *record = T::from_row(&fetched)?;
    Ok(())
}

/// Fetches the first record matched by the composed criteria
///
/// Result ordering is engine-defined unless a criteria imposes one. Fails
/// with [`StoreError::NotFound`] when no row matches.
pub async fn select_one_where<T: Record>(
    exec: &mut dyn Executor,
    record: &mut T,
    criteria: &[SelectCriteria],
) -> Result<(), StoreError> {
    let table = T::table();
    let query = SelectCriteria::apply_all(SelectQuery::new(table), criteria).limit(1);

    let statement = sql::render_select(query, exec.dialect());
    let fetched = exec
        .fetch_optional(statement, table)
        .await?
        .ok_or(StoreError::NotFound)?;
    *record = T::from_row(&fetched)?;
    Ok(())
}

/// Returns up to `limit` records plus a has-more flag
///
/// Requests `limit + 1` rows: a full over-fetch means more data exists
/// beyond the page. Limit normalization: negative limits clamp to 0, and a
/// limit of 0 yields an empty page whose `has_more` still reports whether
/// any row matched at all.
pub async fn select_many_where<T: Record>(
    exec: &mut dyn Executor,
    limit: i64,
    criteria: &[SelectCriteria],
) -> Result<Page<T>, StoreError> {
    let table = T::table();
    let limit = limit.max(0);
    let over_fetch = limit.saturating_add(1);

    let query = SelectCriteria::apply_all(SelectQuery::new(table), criteria).limit(over_fetch);
    let statement = sql::render_select(query, exec.dialect());
    let rows = exec.fetch_all(statement, table).await?;

    if rows.len() as i64 > over_fetch {
        return Err(StoreError::DriverContract(format!(
            "{}: fetched {} rows for a limit of {}",
            table.name,
            rows.len(),
            over_fetch
        )));
    }

    let mut records = rows
        .iter()
        .map(T::from_row)
        .collect::<Result<Vec<_>, _>>()?;
    let has_more = records.len() as i64 == over_fetch;
    if has_more {
        records.truncate(limit as usize);
    }

    Ok(Page { records, has_more })
}

/// Updates the single row matching the record's primary key
///
/// Sets every non-key column to the record's current value; key columns are
/// identity and never assigned. Returns the number of affected rows; 0 when
/// no row matches, which is not an error.
pub async fn update_one_by_pk<T: Record>(
    exec: &mut dyn Executor,
    record: &T,
) -> Result<u64, StoreError> {
    let table = T::table();
    require_key(table)?;
    let row = checked_row(record)?;

    if table.data_columns().next().is_none() {
        // All columns form the key; there is nothing to assign.
        return Ok(0);
    }

    let mut query = UpdateQuery::new(table);
    for (column, value) in table.columns.iter().zip(row.iter()) {
        if !column.primary_key {
            query = query.set(column.name, value.clone());
        }
    }
    for (column, value) in key_values(table, &row) {
        query = query.filter(eq(column.name, value.clone()));
    }

    exec.execute(sql::render_update(query, exec.dialect())).await
}

/// Updates a batch of rows by primary key as one bulk statement
///
/// Semantically equivalent to one [`update_one_by_pk`] per record, executed
/// as a single statement. Returns the number of affected rows.
pub async fn update_many_by_pk<T: Record>(
    exec: &mut dyn Executor,
    records: &[T],
) -> Result<u64, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let table = T::table();
    require_key(table)?;
    if table.data_columns().next().is_none() {
        return Ok(0);
    }

    let rows = checked_rows(records)?;
    let statement = sql::render_bulk_update_by_key(table, &rows, exec.dialect());
    exec.execute(statement).await
}

/// Updates the rows matched by the composed criteria
///
/// Non-key columns are set from the record's values. An empty criteria
/// slice updates every row of the table. Returns the number of affected
/// rows.
pub async fn update_where<T: Record>(
    exec: &mut dyn Executor,
    record: &T,
    criteria: &[UpdateCriteria],
) -> Result<u64, StoreError> {
    let table = T::table();
    let row = checked_row(record)?;

    if table.data_columns().next().is_none() {
        return Ok(0);
    }

    let mut query = UpdateQuery::new(table);
    for (column, value) in table.columns.iter().zip(row.iter()) {
        if !column.primary_key {
            query = query.set(column.name, value.clone());
        }
    }
    let query = UpdateCriteria::apply_all(query, criteria);

    exec.execute(sql::render_update(query, exec.dialect())).await
}

/// Inserts one record, updating the existing row on key conflict
///
/// Returns the number of rows affected (inserted plus updated).
pub async fn upsert<T: Record>(exec: &mut dyn Executor, record: &T) -> Result<u64, StoreError> {
    let table = T::table();
    require_key(table)?;
    let row = checked_row(record)?;

    let statement = sql::render_insert(table, &[row], OnConflict::Update, exec.dialect());
    exec.execute(statement).await
}

/// Upserts a batch of records as one multi-row statement
///
/// Returns the number of rows affected (inserted plus updated); an empty
/// batch affects nothing.
pub async fn upsert_many<T: Record>(
    exec: &mut dyn Executor,
    records: &[T],
) -> Result<u64, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let table = T::table();
    require_key(table)?;
    let rows = checked_rows(records)?;

    let statement = sql::render_insert(table, &rows, OnConflict::Update, exec.dialect());
    exec.execute(statement).await
}

/// Deletes the row matching the record's primary key
///
/// Returns the number of affected rows (0 when nothing matched).
pub async fn delete_by_pk<T: Record>(exec: &mut dyn Executor, record: &T) -> Result<u64, StoreError> {
    let table = T::table();
    require_key(table)?;
    let row = checked_row(record)?;

    let statement = sql::render_delete_by_key(table, &[row], exec.dialect());
    exec.execute(statement).await
}

/// Deletes the rows matching a batch of primary keys as one statement
///
/// Returns the number of affected rows; an empty batch affects nothing.
pub async fn delete_many_by_pk<T: Record>(
    exec: &mut dyn Executor,
    records: &[T],
) -> Result<u64, StoreError> {
    if records.is_empty() {
        return Ok(0);
    }
    let table = T::table();
    require_key(table)?;
    let rows = checked_rows(records)?;

    let statement = sql::render_delete_by_key(table, &rows, exec.dialect());
    exec.execute(statement).await
}

/// Deletes the rows matched by the composed criteria
///
/// An empty criteria slice deletes every row of the table. Returns the
/// number of affected rows.
pub async fn delete_where<T: Record>(
    exec: &mut dyn Executor,
    criteria: &[DeleteCriteria],
) -> Result<u64, StoreError> {
    let table = T::table();
    let query = DeleteCriteria::apply_all(DeleteQuery::new(table), criteria);

    exec.execute(sql::render_delete(query, exec.dialect())).await
}
