//! Criteria composition tests

use store_kernel::sql::{render_delete, render_select, render_update};
use store_kernel::{
    eq, gte, in_list, is_null, like, lt, ne, ColumnDef, ColumnType, DeleteCriteria, DeleteQuery,
    Dialect, SelectCriteria, SelectQuery, SortOrder, TableDef, UpdateCriteria, UpdateQuery, Value,
};

static BOOKS: TableDef = TableDef::new(
    "books",
    &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("title", ColumnType::Text).not_null(),
        ColumnDef::new("pages", ColumnType::BigInt),
    ],
);

#[test]
fn select_criteria_apply_in_sequence() {
    let criteria = vec![
        SelectCriteria::new(|q| q.filter(gte("id", "2"))),
        SelectCriteria::new(|q| q.order_by("id", SortOrder::Asc)),
    ];

    let query = SelectCriteria::apply_all(SelectQuery::new(&BOOKS), &criteria);
    let stmt = render_select(query, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "SELECT \"id\", \"title\", \"pages\" FROM \"books\" WHERE (\"id\" >= ?) \
         ORDER BY \"id\" ASC"
    );
}

#[test]
fn later_criteria_narrow_earlier_ones() {
    let criteria = vec![
        SelectCriteria::new(|q| q.filter(gte("pages", 100i64))),
        SelectCriteria::new(|q| q.filter(lt("pages", 500i64))),
    ];

    let query = SelectCriteria::apply_all(SelectQuery::new(&BOOKS), &criteria);
    assert_eq!(
        render_select(query, Dialect::Sqlite).sql,
        "SELECT \"id\", \"title\", \"pages\" FROM \"books\" \
         WHERE (\"pages\" >= ?) AND (\"pages\" < ?)"
    );
}

#[test]
fn update_criteria_only_touch_the_where_side() {
    let criteria = vec![UpdateCriteria::new(|q| q.filter(eq("id", "1")))];

    let query = UpdateQuery::new(&BOOKS).set("title", "changed");
    let query = UpdateCriteria::apply_all(query, &criteria);
    let stmt = render_update(query, Dialect::Sqlite);
    assert_eq!(
        stmt.sql,
        "UPDATE \"books\" SET \"title\" = ? WHERE (\"id\" = ?)"
    );
}

#[test]
fn delete_criteria_compose_like_select_criteria() {
    let criteria = vec![
        DeleteCriteria::new(|q| q.filter(ne("title", "keep"))),
        DeleteCriteria::new(|q| q.filter(is_null("pages"))),
    ];

    let query = DeleteCriteria::apply_all(DeleteQuery::new(&BOOKS), &criteria);
    assert_eq!(
        render_delete(query, Dialect::Sqlite).sql,
        "DELETE FROM \"books\" WHERE (\"title\" <> ?) AND (\"pages\" IS NULL)"
    );
}

#[test]
fn raw_fragments_pass_through_verbatim() {
    let criteria = vec![SelectCriteria::new(|q| {
        q.filter_raw("length(\"title\") > ?", vec![Value::from(3i64)])
    })];

    let query = SelectCriteria::apply_all(SelectQuery::new(&BOOKS), &criteria);
    let stmt = render_select(query, Dialect::Postgres);
    assert!(stmt.sql.contains("length(\"title\") > $1"));
}

#[test]
fn combinator_fragments_cover_like_and_in() {
    let query = SelectQuery::new(&BOOKS)
        .filter(like("title", "The %"))
        .filter(in_list(
            "id",
            vec![Value::from("1"), Value::from("2"), Value::from("3")],
        ));
    let stmt = render_select(query, Dialect::Sqlite);
    assert!(stmt.sql.contains("(\"title\" LIKE ?)"));
    assert!(stmt.sql.contains("(\"id\" IN (?, ?, ?))"));
    assert_eq!(stmt.params.len(), 4);
}
