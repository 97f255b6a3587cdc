//! Rendering tests for the dialect-aware SQL layer

use proptest::prelude::*;
use store_kernel::sql::{
    render_bulk_update_by_key, render_create_index, render_create_table, render_delete,
    render_delete_by_key, render_drop_table, render_insert, render_select, render_update,
};
use store_kernel::{
    eq, gte, ColumnDef, ColumnType, DeleteQuery, Dialect, OnConflict, SelectQuery, SortOrder,
    TableDef, UpdateQuery, Value,
};

static BOOKS: TableDef = TableDef::new(
    "books",
    &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("title", ColumnType::Text).not_null(),
    ],
);

static TAGGINGS: TableDef = TableDef::new(
    "taggings",
    &[
        ColumnDef::new("book_id", ColumnType::Text).primary_key(),
        ColumnDef::new("tag_id", ColumnType::Text).primary_key(),
    ],
);

static METRICS: TableDef = TableDef::new(
    "metrics",
    &[
        ColumnDef::new("name", ColumnType::Text).primary_key(),
        ColumnDef::new("count", ColumnType::BigInt).not_null(),
        ColumnDef::new("payload", ColumnType::Binary),
    ],
);

#[test]
fn select_without_conditions_lists_all_columns() {
    let stmt = render_select(SelectQuery::new(&BOOKS), Dialect::Sqlite);
    assert_eq!(stmt.sql, "SELECT \"id\", \"title\" FROM \"books\"");
    assert!(stmt.params.is_empty());
}

#[test]
fn select_renders_conditions_order_and_limit() {
    let query = SelectQuery::new(&BOOKS)
        .filter(eq("id", "1"))
        .filter(gte("title", "m"))
        .order_by("title", SortOrder::Desc)
        .limit(5);
    let stmt = render_select(query, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "SELECT \"id\", \"title\" FROM \"books\" WHERE (\"id\" = ?) AND (\"title\" >= ?) \
         ORDER BY \"title\" DESC LIMIT 5"
    );
    assert_eq!(stmt.params.len(), 2);
}

#[test]
fn postgres_renumbers_placeholders() {
    let query = SelectQuery::new(&BOOKS)
        .filter(eq("id", "1"))
        .filter(gte("title", "m"));
    let stmt = render_select(query, Dialect::Postgres);
    assert!(stmt.sql.contains("(\"id\" = $1) AND (\"title\" >= $2)"));
    assert!(!stmt.sql.contains('?'));
}

#[test]
fn update_orders_assignment_params_before_condition_params() {
    let query = UpdateQuery::new(&BOOKS)
        .set("title", "new")
        .filter(eq("id", "1"));
    let stmt = render_update(query, Dialect::Postgres);
    assert_eq!(
        stmt.sql,
        "UPDATE \"books\" SET \"title\" = $1 WHERE (\"id\" = $2)"
    );
    assert_eq!(
        stmt.params,
        vec![Value::from("new"), Value::from("1")]
    );
}

#[test]
fn delete_without_conditions_has_no_where() {
    let stmt = render_delete(DeleteQuery::new(&BOOKS), Dialect::Sqlite);
    assert_eq!(stmt.sql, "DELETE FROM \"books\"");
}

#[test]
fn insert_renders_multi_row_groups() {
    let rows = vec![
        vec![Value::from("1"), Value::from("a")],
        vec![Value::from("2"), Value::from("b")],
    ];
    let stmt = render_insert(&BOOKS, &rows, OnConflict::Error, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "INSERT INTO \"books\" (\"id\", \"title\") VALUES (?, ?), (?, ?)"
    );
    assert_eq!(stmt.params.len(), 4);
}

#[test]
fn insert_ignore_appends_do_nothing() {
    let rows = vec![vec![Value::from("1"), Value::from("a")]];
    let stmt = render_insert(&BOOKS, &rows, OnConflict::Ignore, Dialect::Sqlite);
    assert!(stmt.sql.ends_with("ON CONFLICT DO NOTHING"));
}

#[test]
fn upsert_targets_key_and_updates_data_columns() {
    let rows = vec![vec![Value::from("1"), Value::from("a")]];
    let stmt = render_insert(&BOOKS, &rows, OnConflict::Update, Dialect::Sqlite);
    assert!(stmt
        .sql
        .ends_with("ON CONFLICT (\"id\") DO UPDATE SET \"title\" = excluded.\"title\""));
}

#[test]
fn upsert_on_all_key_table_degrades_to_ignore() {
    let rows = vec![vec![Value::from("b1"), Value::from("t1")]];
    let stmt = render_insert(&TAGGINGS, &rows, OnConflict::Update, Dialect::Sqlite);
    assert!(stmt.sql.ends_with("ON CONFLICT DO NOTHING"));
}

#[test]
fn bulk_update_by_key_renders_case_per_data_column() {
    let rows = vec![
        vec![Value::from("1"), Value::from(10i64), Value::Binary(None)],
        vec![Value::from("2"), Value::from(20i64), Value::Binary(None)],
    ];
    let stmt = render_bulk_update_by_key(&METRICS, &rows, Dialect::Sqlite);
    assert!(stmt.sql.starts_with("UPDATE \"metrics\" SET \"count\" = CASE"));
    assert!(stmt.sql.contains("\"payload\" = CASE"));
    assert!(stmt.sql.contains("ELSE \"count\" END"));
    assert!(stmt.sql.contains("WHERE (\"name\" = ?) OR (\"name\" = ?)"));
    // 2 data columns x 2 rows x (1 key + 1 value) + 2 key params in WHERE
    assert_eq!(stmt.params.len(), 10);
}

#[test]
fn delete_by_key_matches_composite_keys() {
    let rows = vec![
        vec![Value::from("b1"), Value::from("t1")],
        vec![Value::from("b2"), Value::from("t2")],
    ];
    let stmt = render_delete_by_key(&TAGGINGS, &rows, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "DELETE FROM \"taggings\" WHERE (\"book_id\" = ? AND \"tag_id\" = ?) \
         OR (\"book_id\" = ? AND \"tag_id\" = ?)"
    );
    assert_eq!(stmt.params.len(), 4);
}

#[test]
fn create_table_renders_constraints_from_descriptor() {
    let stmt = render_create_table(&METRICS, false, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "CREATE TABLE \"metrics\" (\"name\" TEXT NOT NULL, \"count\" BIGINT NOT NULL, \
         \"payload\" BLOB, PRIMARY KEY (\"name\"))"
    );

    let stmt = render_create_table(&METRICS, true, Dialect::Postgres);
    assert!(stmt.sql.starts_with("CREATE TABLE IF NOT EXISTS"));
    assert!(stmt.sql.contains("\"payload\" BYTEA"));
}

#[test]
fn create_table_renders_composite_primary_key() {
    let stmt = render_create_table(&TAGGINGS, false, Dialect::Sqlite);
    assert!(stmt.sql.contains("PRIMARY KEY (\"book_id\", \"tag_id\")"));
}

#[test]
fn drop_table_cascades_only_where_supported() {
    let stmt = render_drop_table(&BOOKS, Dialect::Sqlite);
    assert_eq!(stmt.sql, "DROP TABLE IF EXISTS \"books\"");

    let stmt = render_drop_table(&BOOKS, Dialect::Postgres);
    assert_eq!(stmt.sql, "DROP TABLE IF EXISTS \"books\" CASCADE");
}

#[test]
fn create_index_names_table_and_column() {
    let stmt = render_create_index(&BOOKS, "books_title_idx", "title", Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "CREATE INDEX \"books_title_idx\" ON \"books\" (\"title\")"
    );
}

proptest! {
    /// Every bind value gets exactly one numbered placeholder on Postgres.
    #[test]
    fn placeholder_count_matches_params(values in prop::collection::vec(any::<i64>(), 1..20)) {
        let mut query = SelectQuery::new(&METRICS);
        for value in &values {
            query = query.filter(eq("count", *value));
        }
        let stmt = render_select(query, Dialect::Postgres);
        prop_assert_eq!(stmt.params.len(), values.len());
        prop_assert!(!stmt.sql.contains('?'));
        let last_placeholder = format!("${}", values.len());
        prop_assert!(stmt.sql.contains(&last_placeholder));
    }
}
