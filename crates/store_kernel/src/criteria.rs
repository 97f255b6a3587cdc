//! Composable predicate transformers
//!
//! Criteria are pure functions refining a query shape: each application may
//! narrow the statement further, none performs I/O. A repository operation
//! takes a slice of criteria and applies them left to right; the empty slice
//! means "no additional predicate".
//!
//! Predicate fragments use `?` placeholders regardless of dialect; the
//! renderer renumbers them for engines that want `$N`. Fragments are passed
//! through verbatim, so literal `?` characters inside quoted SQL strings are
//! not supported; bind such values instead.

use serde::{Deserialize, Serialize};

use crate::record::TableDef;
use crate::sql::quote_ident;
use crate::value::Value;

/// Sort direction for select ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One predicate fragment plus its bind values
#[derive(Debug, Clone, PartialEq)]
pub struct Cond {
    pub(crate) fragment: String,
    pub(crate) params: Vec<Value>,
}

impl Cond {
    /// A raw fragment with explicit bind values
    pub fn raw(fragment: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            fragment: fragment.into(),
            params,
        }
    }
}

/// `column = value`
pub fn eq(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, "=", value)
}

/// `column <> value`
pub fn ne(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, "<>", value)
}

/// `column > value`
pub fn gt(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, ">", value)
}

/// `column >= value`
pub fn gte(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, ">=", value)
}

/// `column < value`
pub fn lt(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, "<", value)
}

/// `column <= value`
pub fn lte(column: &str, value: impl Into<Value>) -> Cond {
    binary_cond(column, "<=", value)
}

/// `column LIKE pattern`
pub fn like(column: &str, pattern: impl Into<String>) -> Cond {
    Cond {
        fragment: format!("{} LIKE ?", quote_ident(column)),
        params: vec![Value::Text(Some(pattern.into()))],
    }
}

/// `column IN (values...)`; an empty list matches nothing
pub fn in_list(column: &str, values: Vec<Value>) -> Cond {
    if values.is_empty() {
        return Cond {
            fragment: "1 = 0".to_string(),
            params: Vec::new(),
        };
    }
    let placeholders = vec!["?"; values.len()].join(", ");
    Cond {
        fragment: format!("{} IN ({})", quote_ident(column), placeholders),
        params: values,
    }
}

/// `column IS NULL`
pub fn is_null(column: &str) -> Cond {
    Cond {
        fragment: format!("{} IS NULL", quote_ident(column)),
        params: Vec::new(),
    }
}

/// `column IS NOT NULL`
pub fn is_not_null(column: &str) -> Cond {
    Cond {
        fragment: format!("{} IS NOT NULL", quote_ident(column)),
        params: Vec::new(),
    }
}

fn binary_cond(column: &str, operator: &str, value: impl Into<Value>) -> Cond {
    Cond {
        fragment: format!("{} {} ?", quote_ident(column), operator),
        params: vec![value.into()],
    }
}

/// Accumulating shape of a SELECT statement
///
/// Conditions are ANDed in the order they were added. The limit is owned by
/// the repository's pagination logic, which sets it after criteria have been
/// applied.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    pub(crate) table: &'static TableDef,
    pub(crate) conditions: Vec<Cond>,
    pub(crate) order: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<i64>,
}

impl SelectQuery {
    pub fn new(table: &'static TableDef) -> Self {
        Self {
            table,
            conditions: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &'static TableDef {
        self.table
    }

    /// Adds a predicate; all predicates are ANDed
    pub fn filter(mut self, cond: Cond) -> Self {
        self.conditions.push(cond);
        self
    }

    /// Adds a raw predicate fragment with bind values
    pub fn filter_raw(self, fragment: impl Into<String>, params: Vec<Value>) -> Self {
        self.filter(Cond::raw(fragment, params))
    }

    /// Appends an ORDER BY term
    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order.push((column.to_string(), order));
        self
    }

    /// Caps the number of returned rows; overridden by pagination
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Accumulating shape of an UPDATE statement
///
/// Assignments are set by the repository from the record's non-key columns;
/// criteria contribute the WHERE side only.
#[derive(Debug, Clone)]
pub struct UpdateQuery {
    pub(crate) table: &'static TableDef,
    pub(crate) assignments: Vec<(String, Value)>,
    pub(crate) conditions: Vec<Cond>,
}

impl UpdateQuery {
    pub fn new(table: &'static TableDef) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static TableDef {
        self.table
    }

    /// Adds a `SET column = value` assignment
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.assignments.push((column.to_string(), value.into()));
        self
    }

    pub fn filter(mut self, cond: Cond) -> Self {
        self.conditions.push(cond);
        self
    }

    pub fn filter_raw(self, fragment: impl Into<String>, params: Vec<Value>) -> Self {
        self.filter(Cond::raw(fragment, params))
    }
}

/// Accumulating shape of a DELETE statement
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    pub(crate) table: &'static TableDef,
    pub(crate) conditions: Vec<Cond>,
}

impl DeleteQuery {
    pub fn new(table: &'static TableDef) -> Self {
        Self {
            table,
            conditions: Vec::new(),
        }
    }

    pub fn table(&self) -> &'static TableDef {
        self.table
    }

    pub fn filter(mut self, cond: Cond) -> Self {
        self.conditions.push(cond);
        self
    }

    pub fn filter_raw(self, fragment: impl Into<String>, params: Vec<Value>) -> Self {
        self.filter(Cond::raw(fragment, params))
    }
}

macro_rules! criteria_newtype {
    ($(#[$doc:meta])* $name:ident, $query:ident) => {
        $(#[$doc])*
        pub struct $name(Box<dyn Fn($query) -> $query + Send + Sync>);

        impl $name {
            /// Wraps a pure transform over the query shape
            pub fn new(f: impl Fn($query) -> $query + Send + Sync + 'static) -> Self {
                Self(Box::new(f))
            }

            /// Applies this criteria to the query
            pub fn apply(&self, query: $query) -> $query {
                (self.0)(query)
            }

            /// Applies a sequence of criteria left to right
            pub fn apply_all(query: $query, criteria: &[$name]) -> $query {
                criteria.iter().fold(query, |q, c| c.apply(q))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

criteria_newtype!(
    /// Pure transform of a [`SelectQuery`]
    SelectCriteria,
    SelectQuery
);
criteria_newtype!(
    /// Pure transform of an [`UpdateQuery`]
    UpdateCriteria,
    UpdateQuery
);
criteria_newtype!(
    /// Pure transform of a [`DeleteQuery`]
    DeleteCriteria,
    DeleteQuery
);
