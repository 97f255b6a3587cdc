//! Record fixtures used across the integration test suite

use store_kernel::{ColumnDef, ColumnType, DecodeError, Record, Row, TableDef, Value};
use uuid::Uuid;

/// A simple single-key record, the workhorse of the repository tests
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
}

pub static BOOKS: TableDef = TableDef::new(
    "books",
    &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("title", ColumnType::Text).not_null(),
    ],
);

impl Book {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// A book with a random identity
    pub fn random(title: impl Into<String>) -> Self {
        Self::new(Uuid::new_v4().to_string(), title)
    }
}

impl Record for Book {
    fn table() -> &'static TableDef {
        &BOOKS
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.clone()),
            Value::from(self.title.clone()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.text("id")?,
            title: row.text("title")?,
        })
    }
}

/// Four well-known books, ids "1" through "4"
pub fn seed_books() -> Vec<Book> {
    (1..=4)
        .map(|n| Book::new(n.to_string(), format!("Title {n}")))
        .collect()
}

/// Record with a nullable field carrying a NOT NULL constraint, used to
/// provoke integrity failures
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: String,
    pub area: Option<i64>,
}

pub static CARS: TableDef = TableDef::new(
    "cars",
    &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("area", ColumnType::BigInt).not_null(),
    ],
);

impl Record for Car {
    fn table() -> &'static TableDef {
        &CARS
    }

    fn to_row(&self) -> Vec<Value> {
        vec![Value::from(self.id.clone()), Value::from(self.area)]
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.text("id")?,
            area: row.opt_big_int("area")?,
        })
    }
}

/// Primary record for the schema tests
#[derive(Debug, Clone, PartialEq)]
pub struct Animal {
    pub id: String,
    pub name: String,
}

pub static ANIMALS: TableDef = TableDef::new(
    "animals",
    &[
        ColumnDef::new("id", ColumnType::Text).primary_key(),
        ColumnDef::new("name", ColumnType::Text).not_null(),
    ],
);

impl Record for Animal {
    fn table() -> &'static TableDef {
        &ANIMALS
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.clone()),
            Value::from(self.name.clone()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            id: row.text("id")?,
            name: row.text("name")?,
        })
    }
}

/// Intermediary (join) record with a composite primary key
#[derive(Debug, Clone, PartialEq)]
pub struct AnimalToCar {
    pub animal_id: String,
    pub car_id: String,
    pub brand: String,
}

pub static ANIMALS_TO_CARS: TableDef = TableDef::new(
    "animals_to_cars",
    &[
        ColumnDef::new("animal_id", ColumnType::Text).primary_key(),
        ColumnDef::new("car_id", ColumnType::Text).primary_key(),
        ColumnDef::new("brand", ColumnType::Text).not_null(),
    ],
);

impl Record for AnimalToCar {
    fn table() -> &'static TableDef {
        &ANIMALS_TO_CARS
    }

    fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.animal_id.clone()),
            Value::from(self.car_id.clone()),
            Value::from(self.brand.clone()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, DecodeError> {
        Ok(Self {
            animal_id: row.text("animal_id")?,
            car_id: row.text("car_id")?,
            brand: row.text("brand")?,
        })
    }
}
