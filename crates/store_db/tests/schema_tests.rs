//! Integration tests for the transactional schema manager

use store_db::{repository, SchemaManager, StoreError};
use test_utils::{open_memory_store, seed_books, Animal, Book, ANIMALS, ANIMALS_TO_CARS, BOOKS, CARS};

#[tokio::test]
async fn create_tables_makes_empty_tables_queryable() {
    let store = open_memory_store("schema_create").await;
    let manager = SchemaManager::new(store.clone());

    manager
        .create_tables(&[&ANIMALS, &CARS], &[&ANIMALS_TO_CARS])
        .await
        .unwrap();

    // The table exists but holds nothing yet.
    let mut store = store;
    let mut missing = Animal {
        id: "987654321".to_string(),
        name: String::new(),
    };
    let err = repository::select_one_by_pk(&mut store, &mut missing)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_tables_rolls_back_the_whole_group_on_failure() {
    let store = open_memory_store("schema_create_atomic").await;
    let manager = SchemaManager::new(store.clone());

    manager.create_tables(&[&ANIMALS], &[]).await.unwrap();

    // CARS would succeed, but ANIMALS already exists, so the whole
    // transaction must roll back.
    let err = manager
        .create_tables(&[&CARS, &ANIMALS], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::CreateTablesFailed { .. }));

    // CARS must not have been left behind.
    let mut store = store;
    let probe = test_utils::Car {
        id: "c1".to_string(),
        area: Some(1),
    };
    let err = repository::create(&mut store, &probe, false).await.unwrap_err();
    assert!(matches!(err, StoreError::ExecutionFailure(_)));
}

#[tokio::test]
async fn drop_tables_tolerates_tables_that_never_existed() {
    let store = open_memory_store("schema_drop_missing").await;
    let manager = SchemaManager::new(store);

    manager
        .drop_tables(&[&ANIMALS, &CARS], &[&ANIMALS_TO_CARS])
        .await
        .unwrap();
}

#[tokio::test]
async fn drop_tables_removes_existing_tables() {
    let store = open_memory_store("schema_drop").await;
    let manager = SchemaManager::new(store.clone());

    manager.create_tables(&[&BOOKS], &[]).await.unwrap();
    manager.drop_tables(&[&BOOKS], &[]).await.unwrap();

    let mut store = store;
    let err = repository::create(&mut store, &Book::new("1", "t"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ExecutionFailure(_)));
}

#[tokio::test]
async fn drop_and_create_yields_a_fresh_schema_without_old_data() {
    let store = open_memory_store("schema_recreate").await;
    let manager = SchemaManager::new(store.clone());

    manager.create_tables(&[&BOOKS], &[]).await.unwrap();
    let mut store_handle = store.clone();
    repository::create_many(&mut store_handle, &seed_books(), false)
        .await
        .unwrap();

    manager.drop_and_create_tables(&[&BOOKS], &[]).await.unwrap();

    let page = repository::select_many_where::<Book>(&mut store_handle, 10, &[])
        .await
        .unwrap();
    assert!(page.records.is_empty());
    assert!(!page.has_more);
}

#[tokio::test]
async fn drop_and_create_restores_everything_when_a_phase_fails() {
    let store = open_memory_store("schema_recreate_atomic").await;
    let manager = SchemaManager::new(store.clone());

    manager.create_tables(&[&BOOKS], &[]).await.unwrap();
    let mut store_handle = store.clone();
    let seed = seed_books();
    repository::create_many(&mut store_handle, &seed, false)
        .await
        .unwrap();

    // The duplicated descriptor makes the create phase fail after the drop
    // phase already ran; the rollback must bring the data back.
    let err = manager
        .drop_and_create_tables(&[&BOOKS, &BOOKS], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DropCreateTablesFailed { .. }));

    let page = repository::select_many_where::<Book>(&mut store_handle, 10, &[])
        .await
        .unwrap();
    assert_eq!(page.records.len(), seed.len());
}

#[tokio::test]
async fn registration_keeps_intermediaries_ahead_of_primaries() {
    let store = open_memory_store("schema_register").await;
    let mut manager = SchemaManager::new(store);

    manager.register_record_types(&[&ANIMALS, &CARS], &[&ANIMALS_TO_CARS]);

    let names: Vec<_> = manager.registered().iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["animals_to_cars", "animals", "cars"]);

    // Re-registration replaces in place rather than duplicating.
    manager.register_record_types(&[&CARS], &[]);
    assert_eq!(manager.registered().len(), 3);
}

#[tokio::test]
async fn create_index_succeeds_on_a_declared_column() {
    let store = open_memory_store("schema_index").await;
    let manager = SchemaManager::new(store);

    manager.create_tables(&[&BOOKS], &[]).await.unwrap();
    manager
        .create_index(&BOOKS, "books_title_idx", "title")
        .await
        .unwrap();

    // Same name again: the engine rejects it and the error surfaces.
    let err = manager
        .create_index(&BOOKS, "books_title_idx", "title")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ExecutionFailure(_)));
}

#[tokio::test]
async fn create_index_rejects_undeclared_columns() {
    let store = open_memory_store("schema_index_missing").await;
    let manager = SchemaManager::new(store);

    manager.create_tables(&[&BOOKS], &[]).await.unwrap();
    let err = manager
        .create_index(&BOOKS, "books_nope_idx", "nope")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidDescriptor(_)));
}
