use database::SqliteTodoService;
use mocks::{test_service_contract, MockTodoService};

/// Contract tests that all TodoService implementations must pass
///
/// The same suite runs against the SQLite service and the in-memory mock so
/// handler tests written against the mock stay meaningful for production.

async fn create_test_service() -> SqliteTodoService {
    let service = SqliteTodoService::new(":memory:").await.unwrap();
    service.migrate().await.unwrap();
    service
}

#[tokio::test]
async fn test_sqlite_service_contract() {
    let service = create_test_service().await;
    test_service_contract(&service).await;
}

#[tokio::test]
async fn test_sqlite_file_service_contract() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.db");

    let service = SqliteTodoService::new(path.to_str().unwrap()).await.unwrap();
    service.migrate().await.unwrap();

    test_service_contract(&service).await;
    service.close().await;
}

#[tokio::test]
async fn test_mock_service_contract() {
    let service = MockTodoService::new();
    test_service_contract(&service).await;
}
