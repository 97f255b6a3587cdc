//! Dialect-aware SQL rendering
//!
//! The data-access layer builds statement text and bind lists itself and
//! hands both to the execution engine. Statements are first rendered with
//! `?` placeholders and finalized per dialect (`$N` renumbering for
//! Postgres). Only the rendering below is dialect-aware; predicate fragments
//! written by callers pass through untouched.

use crate::criteria::{Cond, DeleteQuery, SelectQuery, SortOrder, UpdateQuery};
use crate::record::TableDef;
use crate::value::{ColumnType, Value};

/// SQL dialect of a storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    /// DDL type name for a column scalar
    pub fn column_type(self, ty: ColumnType) -> &'static str {
        match (self, ty) {
            (_, ColumnType::Boolean) => "BOOLEAN",
            (_, ColumnType::BigInt) => "BIGINT",
            (Dialect::Sqlite, ColumnType::Double) => "DOUBLE",
            (Dialect::Postgres, ColumnType::Double) => "DOUBLE PRECISION",
            (_, ColumnType::Text) => "TEXT",
            (Dialect::Sqlite, ColumnType::Binary) => "BLOB",
            (Dialect::Postgres, ColumnType::Binary) => "BYTEA",
        }
    }

    /// Whether DROP TABLE accepts a CASCADE clause
    pub fn supports_drop_cascade(self) -> bool {
        matches!(self, Dialect::Postgres)
    }

    fn finalize(self, sql: String) -> String {
        match self {
            Dialect::Sqlite => sql,
            Dialect::Postgres => number_placeholders(&sql),
        }
    }
}

/// Rewrites `?` placeholders to `$1..$N`
fn number_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0usize;
    for ch in sql.chars() {
        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Double-quotes an identifier, escaping embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A rendered statement: final SQL text plus bind values in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn ddl(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }
}

/// Conflict handling for INSERT rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnConflict {
    /// Let a key conflict fail the statement
    Error,
    /// Suppress key conflicts at the statement level (insert not guaranteed)
    Ignore,
    /// Update the conflicting row's non-key columns from the proposed values
    Update,
}

fn column_list(table: &TableDef) -> String {
    table
        .columns
        .iter()
        .map(|c| quote_ident(c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn where_clause(conditions: &[Cond], sql: &mut String, params: &mut Vec<Value>) {
    if conditions.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    for (index, cond) in conditions.iter().enumerate() {
        if index > 0 {
            sql.push_str(" AND ");
        }
        sql.push('(');
        sql.push_str(&cond.fragment);
        sql.push(')');
        params.extend(cond.params.iter().cloned());
    }
}

/// Renders a SELECT over all declared columns
pub fn render_select(query: SelectQuery, dialect: Dialect) -> Statement {
    let table = query.table;
    let mut sql = format!(
        "SELECT {} FROM {}",
        column_list(table),
        quote_ident(table.name)
    );
    let mut params = Vec::new();

    where_clause(&query.conditions, &mut sql, &mut params);

    if !query.order.is_empty() {
        sql.push_str(" ORDER BY ");
        let terms: Vec<_> = query
            .order
            .iter()
            .map(|(column, order)| {
                let direction = match order {
                    SortOrder::Asc => "ASC",
                    SortOrder::Desc => "DESC",
                };
                format!("{} {}", quote_ident(column), direction)
            })
            .collect();
        sql.push_str(&terms.join(", "));
    }

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

/// Renders an UPDATE from assignments and conditions
///
/// An UPDATE without assignments is a contract breach upstream; the
/// repository never renders one.
pub fn render_update(query: UpdateQuery, dialect: Dialect) -> Statement {
    debug_assert!(!query.assignments.is_empty());

    let mut sql = format!("UPDATE {} SET ", quote_ident(query.table.name));
    let mut params = Vec::new();

    for (index, (column, value)) in query.assignments.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_ident(column));
        sql.push_str(" = ?");
        params.push(value.clone());
    }

    where_clause(&query.conditions, &mut sql, &mut params);

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

/// Renders a DELETE from conditions; no conditions deletes every row
pub fn render_delete(query: DeleteQuery, dialect: Dialect) -> Statement {
    let mut sql = format!("DELETE FROM {}", quote_ident(query.table.name));
    let mut params = Vec::new();

    where_clause(&query.conditions, &mut sql, &mut params);

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

/// Renders a (multi-row) INSERT with the requested conflict handling
///
/// `rows` are full records in column order. `OnConflict::Update` targets the
/// primary-key columns and updates every non-key column from the excluded
/// row; a table whose columns are all part of the key degrades to
/// conflict-ignore, since there is nothing left to update.
pub fn render_insert(
    table: &'static TableDef,
    rows: &[Vec<Value>],
    on_conflict: OnConflict,
    dialect: Dialect,
) -> Statement {
    debug_assert!(!rows.is_empty());

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        quote_ident(table.name),
        column_list(table)
    );
    let mut params = Vec::new();

    let group = format!("({})", vec!["?"; table.columns.len()].join(", "));
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&group);
        params.extend(row.iter().cloned());
    }

    match on_conflict {
        OnConflict::Error => {}
        OnConflict::Ignore => sql.push_str(" ON CONFLICT DO NOTHING"),
        OnConflict::Update => {
            let assignments: Vec<_> = table
                .data_columns()
                .map(|c| format!("{} = excluded.{}", quote_ident(c.name), quote_ident(c.name)))
                .collect();
            if assignments.is_empty() {
                sql.push_str(" ON CONFLICT DO NOTHING");
            } else {
                let key_list = table
                    .key_columns()
                    .map(|c| quote_ident(c.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                sql.push_str(&format!(
                    " ON CONFLICT ({}) DO UPDATE SET {}",
                    key_list,
                    assignments.join(", ")
                ));
            }
        }
    }

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

fn key_match(table: &TableDef, sql: &mut String, params: &mut Vec<Value>, row: &[Value]) {
    sql.push('(');
    let mut first = true;
    for (index, column) in table.columns.iter().enumerate() {
        if !column.primary_key {
            continue;
        }
        if !first {
            sql.push_str(" AND ");
        }
        first = false;
        sql.push_str(&quote_ident(column.name));
        sql.push_str(" = ?");
        params.push(row[index].clone());
    }
    sql.push(')');
}

/// Renders a single bulk UPDATE-by-key statement
///
/// Each non-key column becomes a CASE over the batch's key matches, keeping
/// the statement dialect-neutral while staying semantically equal to one
/// UPDATE per record.
pub fn render_bulk_update_by_key(
    table: &'static TableDef,
    rows: &[Vec<Value>],
    dialect: Dialect,
) -> Statement {
    debug_assert!(!rows.is_empty());
    debug_assert!(table.has_key());

    let mut sql = format!("UPDATE {} SET ", quote_ident(table.name));
    let mut params = Vec::new();

    let mut first_assignment = true;
    for (index, column) in table.columns.iter().enumerate() {
        if column.primary_key {
            continue;
        }
        if !first_assignment {
            sql.push_str(", ");
        }
        first_assignment = false;

        sql.push_str(&quote_ident(column.name));
        sql.push_str(" = CASE");
        for row in rows {
            sql.push_str(" WHEN ");
            key_match(table, &mut sql, &mut params, row);
            sql.push_str(" THEN ?");
            params.push(row[index].clone());
        }
        sql.push_str(" ELSE ");
        sql.push_str(&quote_ident(column.name));
        sql.push_str(" END");
    }

    sql.push_str(" WHERE ");
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            sql.push_str(" OR ");
        }
        key_match(table, &mut sql, &mut params, row);
    }

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

/// Renders a single DELETE matching the batch's keys
pub fn render_delete_by_key(
    table: &'static TableDef,
    rows: &[Vec<Value>],
    dialect: Dialect,
) -> Statement {
    debug_assert!(!rows.is_empty());
    debug_assert!(table.has_key());

    let mut sql = format!("DELETE FROM {} WHERE ", quote_ident(table.name));
    let mut params = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            sql.push_str(" OR ");
        }
        key_match(table, &mut sql, &mut params, row);
    }

    Statement {
        sql: dialect.finalize(sql),
        params,
    }
}

/// Renders CREATE TABLE from the descriptor
pub fn render_create_table(
    table: &'static TableDef,
    if_not_exists: bool,
    dialect: Dialect,
) -> Statement {
    let mut sql = String::from("CREATE TABLE ");
    if if_not_exists {
        sql.push_str("IF NOT EXISTS ");
    }
    sql.push_str(&quote_ident(table.name));
    sql.push_str(" (");

    for (index, column) in table.columns.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&quote_ident(column.name));
        sql.push(' ');
        sql.push_str(dialect.column_type(column.ty));
        if column.not_null {
            sql.push_str(" NOT NULL");
        }
    }

    let keys: Vec<_> = table.key_columns().map(|c| quote_ident(c.name)).collect();
    if !keys.is_empty() {
        sql.push_str(&format!(", PRIMARY KEY ({})", keys.join(", ")));
    }
    sql.push(')');

    Statement::ddl(sql)
}

/// Renders DROP TABLE IF EXISTS, cascading where the dialect supports it
pub fn render_drop_table(table: &'static TableDef, dialect: Dialect) -> Statement {
    let mut sql = format!("DROP TABLE IF EXISTS {}", quote_ident(table.name));
    if dialect.supports_drop_cascade() {
        sql.push_str(" CASCADE");
    }
    Statement::ddl(sql)
}

/// Renders CREATE INDEX on one column
pub fn render_create_index(
    table: &'static TableDef,
    index_name: &str,
    column: &str,
    _dialect: Dialect,
) -> Statement {
    Statement::ddl(format!(
        "CREATE INDEX {} ON {} ({})",
        quote_ident(index_name),
        quote_ident(table.name),
        quote_ident(column)
    ))
}
