//! Contract test helpers for validating TodoService implementations
//!
//! Provides standardized tests that any implementation of the service trait
//! should pass, so the in-memory mock and the SQLite service stay
//! behaviorally interchangeable.

use std::collections::HashSet;
use std::time::Duration;

use crate::assertions::{assert_descending_ids, assert_page_after_cursor};
use todo_core::{CancellationToken, Todo, TodoService};

/// An id no contract test ever creates
const MISSING_ID: i64 = 9_999_999;

/// Test any TodoService implementation with comprehensive contract tests
///
/// The suite shares one service instance and makes no assumption about
/// records created by earlier steps, so it can run against a store that
/// already holds data.
pub async fn test_service_contract<S: TodoService>(service: &S) {
    test_create_contract(service).await;
    test_read_contract(service).await;
    test_update_contract(service).await;
    test_delete_contract(service).await;
    test_cancellation_contract(service).await;
    test_health_check_contract(service).await;
}

/// Test todo creation contract
pub async fn test_create_contract<S: TodoService>(service: &S) {
    let cancel = CancellationToken::new();

    let todo = service
        .create(&cancel, "contract subject", "contract description")
        .await
        .expect("Create should succeed");

    assert!(todo.id > 0, "Created todo should have positive ID");
    assert_eq!(todo.subject, "contract subject");
    assert_eq!(todo.description, "contract description");
    assert_eq!(
        todo.created_at, todo.updated_at,
        "Fresh todo should have identical timestamps"
    );

    let empty_description = service
        .create(&cancel, "no description", "")
        .await
        .expect("Empty description should be accepted");
    assert!(
        empty_description.id > todo.id,
        "Ids should increase with insertion order"
    );
    assert_eq!(empty_description.description, "");

    let result = service.create(&cancel, "", "whatever").await;
    assert!(
        matches!(&result, Err(e) if e.is_constraint_violation()),
        "Empty subject should violate the store constraint, got {result:?}"
    );
}

/// Test cursor pagination contract
pub async fn test_read_contract<S: TodoService>(service: &S) {
    let cancel = CancellationToken::new();

    let mut created = Vec::new();
    for i in 0..25 {
        let todo = service
            .create(&cancel, &format!("page item {i}"), "")
            .await
            .expect("Create should succeed");
        created.push(todo.id);
    }
    let newest = *created.last().expect("created 25 todos");

    let first = service
        .read(&cancel, 0, 10)
        .await
        .expect("Read should succeed");
    assert_eq!(first.len(), 10, "First page should be full");
    assert_eq!(first[0].id, newest, "First page should start at the newest");
    assert_descending_ids(&first);

    let after_newest = service
        .read(&cancel, newest, 5)
        .await
        .expect("Read should succeed");
    assert_page_after_cursor(&after_newest, newest);
    let expected: Vec<i64> = created[19..24].iter().rev().copied().collect();
    assert_eq!(
        after_newest.iter().map(|t| t.id).collect::<Vec<_>>(),
        expected,
        "Cursor page should continue directly below the cursor"
    );

    // Walk the whole store and check the union of pages
    let mut seen = HashSet::new();
    let mut previous: Option<Todo> = None;
    let mut cursor = 0;
    loop {
        let page = service
            .read(&cancel, cursor, 7)
            .await
            .expect("Read should succeed");
        assert!(page.len() <= 7, "Page should never exceed its size");
        assert_page_after_cursor(&page, cursor);
        assert_descending_ids(&page);

        for todo in &page {
            assert!(seen.insert(todo.id), "Todo {} returned twice", todo.id);
            if let Some(prev) = &previous {
                assert!(prev.id > todo.id, "Order should hold across pages");
            }
            previous = Some(todo.clone());
        }

        match page.last() {
            Some(last) => cursor = last.id,
            None => break,
        }
    }
    for id in &created {
        assert!(seen.contains(id), "Todo {id} missing from full walk");
    }

    let oldest = service
        .read(&cancel, 1, 10)
        .await
        .expect("Read should succeed");
    assert!(oldest.is_empty(), "Nothing lies below id 1");
}

/// Test todo update contract
pub async fn test_update_contract<S: TodoService>(service: &S) {
    let cancel = CancellationToken::new();

    let original = service
        .create(&cancel, "before", "old")
        .await
        .expect("Create should succeed");

    tokio::time::sleep(Duration::from_millis(10)).await;

    let updated = service
        .update(&cancel, original.id, "after", "new")
        .await
        .expect("Update should succeed");
    assert_eq!(updated.id, original.id, "Update should preserve ID");
    assert_eq!(updated.subject, "after");
    assert_eq!(updated.description, "new");
    assert_eq!(
        updated.created_at, original.created_at,
        "Update should preserve created_at"
    );
    assert!(
        updated.updated_at > original.updated_at,
        "Update should refresh updated_at"
    );

    let cleared = service
        .update(&cancel, original.id, "after", "")
        .await
        .expect("Clearing the description should succeed");
    assert_eq!(cleared.description, "");

    let zero = service.update(&cancel, 0, "anything", "").await;
    assert!(
        matches!(&zero, Err(e) if e.is_not_found()),
        "Zero id should be NotFound, got {zero:?}"
    );

    let missing = service.update(&cancel, MISSING_ID, "anything", "").await;
    assert!(
        matches!(&missing, Err(e) if e.is_not_found()),
        "Missing id should be NotFound, got {missing:?}"
    );

    let empty = service.update(&cancel, original.id, "", "ignored").await;
    assert!(
        matches!(&empty, Err(e) if e.is_constraint_violation()),
        "Empty subject should be a constraint violation, got {empty:?}"
    );

    let page = service
        .read(&cancel, original.id + 1, 1)
        .await
        .expect("Read should succeed");
    assert_eq!(page[0].id, original.id);
    assert_eq!(page[0].subject, "after", "Rejected update must not apply");
    assert_eq!(page[0].description, "");
}

/// Test bulk delete contract
pub async fn test_delete_contract<S: TodoService>(service: &S) {
    let cancel = CancellationToken::new();

    service
        .delete(&cancel, &[])
        .await
        .expect("Empty delete should be a no-op");

    let keep = service
        .create(&cancel, "keep", "")
        .await
        .expect("Create should succeed");
    let first = service
        .create(&cancel, "delete me", "")
        .await
        .expect("Create should succeed");
    let second = service
        .create(&cancel, "delete me too", "")
        .await
        .expect("Create should succeed");

    service
        .delete(&cancel, &[first.id, MISSING_ID, second.id])
        .await
        .expect("Partial delete should succeed");

    let page = service
        .read(&cancel, second.id + 1, 3)
        .await
        .expect("Read should succeed");
    assert!(
        page.iter().all(|t| t.id != first.id && t.id != second.id),
        "Deleted todos should be gone"
    );
    assert!(page.iter().any(|t| t.id == keep.id), "Unlisted todo should survive");

    let again = service.delete(&cancel, &[first.id, second.id]).await;
    assert!(
        matches!(&again, Err(e) if e.is_not_found()),
        "Deleting only missing ids should be NotFound, got {again:?}"
    );

    service
        .delete(&cancel, &[keep.id, keep.id])
        .await
        .expect("Duplicate ids should delete once");
}

/// Test cooperative cancellation contract
pub async fn test_cancellation_contract<S: TodoService>(service: &S) {
    let live = CancellationToken::new();
    let target = service
        .create(&live, "untouched", "")
        .await
        .expect("Create should succeed");

    let cancelled = CancellationToken::new();
    cancelled.cancel();

    let create = service.create(&cancelled, "never stored", "").await;
    assert!(
        matches!(&create, Err(e) if e.is_cancelled()),
        "Cancelled create should report Cancelled, got {create:?}"
    );
    let read = service.read(&cancelled, 0, 10).await;
    assert!(matches!(&read, Err(e) if e.is_cancelled()));
    let update = service.update(&cancelled, target.id, "changed", "").await;
    assert!(matches!(&update, Err(e) if e.is_cancelled()));
    let delete = service.delete(&cancelled, &[target.id]).await;
    assert!(matches!(&delete, Err(e) if e.is_cancelled()));

    let page = service
        .read(&live, 0, 1)
        .await
        .expect("Read should succeed");
    assert_eq!(page[0].id, target.id, "Cancelled create must not persist");
    assert_eq!(page[0].subject, "untouched", "Cancelled update must not apply");
}

/// Test health check contract
pub async fn test_health_check_contract<S: TodoService>(service: &S) {
    let cancel = CancellationToken::new();
    service
        .health_check(&cancel)
        .await
        .expect("Health check should pass on a working service");
}
