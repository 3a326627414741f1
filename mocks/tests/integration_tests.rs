//! Integration tests for the mocks crate
//!
//! Tests the mock service and utilities to ensure they behave like the real
//! persistence layer and provide the expected testing capabilities.

use mocks::*;
use proptest::prelude::*;
use todo_core::{CancellationToken, TodoError, TodoService};

#[tokio::test]
async fn test_mock_service_passes_contract() {
    let service = MockTodoService::new();
    test_service_contract(&service).await;
}

#[tokio::test]
async fn test_mock_service_contract_with_existing_data() {
    let service = MockTodoService::with_todos(create_test_todos(12));
    test_service_contract(&service).await;
}

#[tokio::test]
async fn test_mock_service_basic_operations() {
    let service = MockTodoService::new();
    let cancel = CancellationToken::new();

    let request = create_new_todo();
    let todo = service
        .create(&cancel, &request.subject, &request.description)
        .await
        .unwrap();

    assert_eq!(todo.id, 1);
    assert_eq!(todo.subject, "New Todo");
    service.assert_called("create");

    let page = service.read(&cancel, 0, 10).await.unwrap();
    assert_todo_equals(&page[0], &todo);
    service.assert_called("read");
    service.assert_not_called("update");
}

#[tokio::test]
async fn test_mock_service_error_injection() {
    let service = MockTodoService::new();
    let cancel = CancellationToken::new();

    service.inject_error(TodoError::Database("disk full".to_string()));
    let result = service.create(&cancel, "first", "").await;
    assert_error_kind(&result, TodoError::is_database);
    assert_eq!(service.todo_count(), 0);

    service.inject_error(TodoError::Internal("boom".to_string()));
    service.clear_error();
    assert!(service.create(&cancel, "second", "").await.is_ok());
}

#[tokio::test]
async fn test_mock_service_call_history() {
    let service = MockTodoService::new();
    let cancel = CancellationToken::new();

    let _ = service.read(&cancel, 5, 3).await;
    let _ = service.delete(&cancel, &[1, 2]).await;

    assert_eq!(service.call_history(), vec!["read(5, 3)", "delete([1, 2])"]);

    service.clear_history();
    assert!(service.call_history().is_empty());
}

#[tokio::test]
async fn test_mock_service_update_edge_cases() {
    let service = MockTodoService::with_todos(vec![TodoBuilder::new().with_id(7).build()]);
    let cancel = CancellationToken::new();

    let update = create_update_todo(7);
    let updated = service
        .update(&cancel, update.id, &update.subject, &update.description)
        .await
        .unwrap();
    assert_eq!(updated.subject, "Updated Todo");
    assert_eq!(service.get(7).unwrap().description, "Updated description");

    for subject in edge_case_subjects() {
        let todo = service.update(&cancel, 7, &subject, "").await.unwrap();
        assert_eq!(todo.subject, subject);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pages_are_descending_and_bounded(request in read_request_strategy(30)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let service = MockTodoService::with_todos(create_test_todos(30));
        let cancel = CancellationToken::new();

        let page = runtime
            .block_on(service.read(&cancel, request.prev_id, request.size))
            .unwrap();

        prop_assert!(page.len() as i64 <= request.size);
        prop_assert!(page.windows(2).all(|w| w[0].id > w[1].id));
        if request.prev_id > 0 {
            prop_assert!(page.iter().all(|t| t.id < request.prev_id));
            let available = (request.prev_id - 1).min(30);
            prop_assert_eq!(page.len() as i64, available.min(request.size));
        } else {
            prop_assert_eq!(page.len() as i64, request.size.min(30));
        }
    }

    #[test]
    fn prop_created_todos_round_trip(request in create_request_strategy()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let service = MockTodoService::new();
        let cancel = CancellationToken::new();

        let todo = runtime
            .block_on(service.create(&cancel, &request.subject, &request.description))
            .unwrap();
        let page = runtime.block_on(service.read(&cancel, 0, 1)).unwrap();

        prop_assert_eq!(&page[0], &todo);
        prop_assert_eq!(todo.subject, request.subject);
        prop_assert_eq!(todo.description, request.description);
    }
}
