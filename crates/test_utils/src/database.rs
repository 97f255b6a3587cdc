//! Store setup helpers for integration tests
//!
//! Tests run against in-memory SQLite databases. Each test gets its own
//! shared-cache database name so a pool (capped at one connection to keep
//! the memory database alive) sees a consistent view while tests stay
//! isolated from each other.

use std::sync::atomic::{AtomicU64, Ordering};

use store_db::{DriverKind, Executor, Store};
use store_kernel::{sql, TableDef};

static NEXT_DB: AtomicU64 = AtomicU64::new(0);

/// Installs a test-friendly tracing subscriber once; later calls are no-ops
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// A unique shared-cache in-memory DSN for this process
pub fn memory_dsn(tag: &str) -> String {
    let n = NEXT_DB.fetch_add(1, Ordering::Relaxed);
    format!("sqlite:file:{tag}_{n}?mode=memory&cache=shared")
}

/// Opens a store on a fresh in-memory database
pub async fn open_memory_store(tag: &str) -> Store {
    init_test_logging();
    Store::connect(DriverKind::Sqlite, memory_dsn(tag), 1, true)
        .await
        .expect("failed to open in-memory store")
}

/// Creates the given tables (if absent) outside any transaction
pub async fn migrate(store: &mut Store, tables: &[&'static TableDef]) {
    for table in tables.iter().copied() {
        let statement = sql::render_create_table(table, true, store.dialect());
        store
            .execute(statement)
            .await
            .unwrap_or_else(|e| panic!("failed to create table {}: {e}", table.name));
    }
}

/// Drops the given tables, ignoring ones that never existed
pub async fn teardown(store: &mut Store, tables: &[&'static TableDef]) {
    for table in tables.iter().copied() {
        let statement = sql::render_drop_table(table, store.dialect());
        store
            .execute(statement)
            .await
            .unwrap_or_else(|e| panic!("failed to drop table {}: {e}", table.name));
    }
}

/// Opens a store and creates the given tables in one step
pub async fn setup_store(tag: &str, tables: &[&'static TableDef]) -> Store {
    let mut store = open_memory_store(tag).await;
    migrate(&mut store, tables).await;
    store
}
