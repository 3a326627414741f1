//! Mock implementation of the TodoService trait
//!
//! Provides a thread-safe in-memory service with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - The same observable semantics as the SQLite implementation

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use todo_core::{run_cancellable, CancellationToken, Result, Todo, TodoError, TodoService};

/// Mock implementation of TodoService for testing
///
/// Records live in a `BTreeMap` keyed by id so descending pages fall out of
/// a reverse range scan. Ids are never reused, matching an auto-increment
/// primary key.
pub struct MockTodoService {
    todos: Arc<Mutex<BTreeMap<i64, Todo>>>,
    next_id: Arc<AtomicI64>,
    error_injection: Arc<Mutex<Option<TodoError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTodoService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTodoService {
    /// Create a new empty mock service
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Create mock service with pre-populated todos
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let max_id = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
        let todo_map = todos.into_iter().map(|todo| (todo.id, todo)).collect();

        Self {
            todos: Arc::new(Mutex::new(todo_map)),
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock service with specific starting ID
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            todos: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(next_id)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TodoError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear any injected error
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Get history of method calls
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert that a specific method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "Method '{method}' was not called. Call history: {:?}",
            *history
        );
    }

    /// Assert that a specific method was not called
    pub fn assert_not_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            !history.iter().any(|call| call.starts_with(method)),
            "Method '{method}' was called unexpectedly. Call history: {:?}",
            *history
        );
    }

    /// Number of records currently stored
    pub fn todo_count(&self) -> usize {
        self.todos.lock().len()
    }

    /// Snapshot of a stored record, bypassing call tracking
    pub fn get(&self, id: i64) -> Option<Todo> {
        self.todos.lock().get(&id).cloned()
    }

    /// Take the injected error, if any (consumed by the first operation)
    fn check_error_injection(&self) -> Result<()> {
        match self.error_injection.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn record_call(&self, method: &str, params: impl std::fmt::Display) {
        self.call_history.lock().push(format!("{method}({params})"));
    }
}

#[async_trait]
impl TodoService for MockTodoService {
    async fn create(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        description: &str,
    ) -> Result<Todo> {
        self.record_call("create", subject);

        run_cancellable(cancel, async {
            self.check_error_injection()?;

            // Mirrors the CHECK(length(subject) > 0) on the table
            if subject.is_empty() {
                return Err(TodoError::ConstraintViolation(
                    "CHECK constraint failed: length(subject) > 0".to_string(),
                ));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let now = Utc::now();
            let todo = Todo {
                id,
                subject: subject.to_string(),
                description: description.to_string(),
                created_at: now,
                updated_at: now,
            };

            self.todos.lock().insert(id, todo.clone());
            Ok(todo)
        })
        .await
    }

    async fn read(&self, cancel: &CancellationToken, prev_id: i64, size: i64) -> Result<Vec<Todo>> {
        self.record_call("read", format_args!("{prev_id}, {size}"));

        run_cancellable(cancel, async {
            self.check_error_injection()?;

            let todos = self.todos.lock();
            let upper = if prev_id > 0 { prev_id } else { i64::MAX };
            // SQLite treats a negative LIMIT as "no limit"
            let limit = usize::try_from(size).unwrap_or(usize::MAX);

            Ok(todos
                .range(..upper)
                .rev()
                .take(limit)
                .map(|(_, todo)| todo.clone())
                .collect())
        })
        .await
    }

    async fn update(
        &self,
        cancel: &CancellationToken,
        id: i64,
        subject: &str,
        description: &str,
    ) -> Result<Todo> {
        self.record_call("update", id);

        if id == 0 {
            return Err(TodoError::not_found_id(id));
        }
        if subject.is_empty() {
            return Err(TodoError::empty_subject());
        }

        run_cancellable(cancel, async {
            self.check_error_injection()?;

            let mut todos = self.todos.lock();
            let todo = todos.get_mut(&id).ok_or_else(|| TodoError::not_found_id(id))?;

            todo.subject = subject.to_string();
            todo.description = description.to_string();
            todo.updated_at = Utc::now();

            Ok(todo.clone())
        })
        .await
    }

    async fn delete(&self, cancel: &CancellationToken, ids: &[i64]) -> Result<()> {
        self.record_call("delete", format_args!("{ids:?}"));

        if ids.is_empty() {
            return Ok(());
        }

        run_cancellable(cancel, async {
            self.check_error_injection()?;

            let mut todos = self.todos.lock();
            let deleted = ids
                .iter()
                .filter(|id| todos.remove(*id).is_some())
                .count();

            if deleted == 0 {
                return Err(TodoError::none_deleted(ids));
            }
            Ok(())
        })
        .await
    }

    async fn health_check(&self, cancel: &CancellationToken) -> Result<()> {
        self.record_call("health_check", "");

        run_cancellable(cancel, async { self.check_error_injection() }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_test_todos;

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let service = MockTodoService::new();
        let cancel = CancellationToken::new();

        let first = service.create(&cancel, "a", "").await.unwrap();
        service.delete(&cancel, &[first.id]).await.unwrap();
        let second = service.create(&cancel, "b", "").await.unwrap();

        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_with_todos_continues_after_highest_id() {
        let service = MockTodoService::with_todos(create_test_todos(3));
        let cancel = CancellationToken::new();

        let todo = service.create(&cancel, "next", "").await.unwrap();
        assert_eq!(todo.id, 4);
        assert_eq!(service.todo_count(), 4);
    }

    #[tokio::test]
    async fn test_negative_size_reads_everything() {
        let service = MockTodoService::with_todos(create_test_todos(15));
        let cancel = CancellationToken::new();

        let page = service.read(&cancel, 0, -1).await.unwrap();
        assert_eq!(page.len(), 15);
    }

    #[tokio::test]
    async fn test_injected_error_is_consumed_once() {
        let service = MockTodoService::new();
        let cancel = CancellationToken::new();

        service.inject_error(TodoError::Database("boom".to_string()));
        assert!(service.health_check(&cancel).await.unwrap_err().is_database());
        assert!(service.health_check(&cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_call_is_recorded_but_not_applied() {
        let service = MockTodoService::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = service.create(&cancel, "never stored", "").await;
        assert!(result.unwrap_err().is_cancelled());
        assert_eq!(service.todo_count(), 0);
        service.assert_called("create");
    }
}
