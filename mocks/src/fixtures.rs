//! Standard test fixtures for consistent testing
//!
//! Provides pre-built test data including:
//! - A standard todo and request payloads
//! - Bulk todo generators with strictly increasing ids
//! - Edge case payloads the boundary layer has to reject

use chrono::{Duration, Utc};
use todo_core::{CreateTodoRequest, DeleteTodoRequest, Todo, UpdateTodoRequest};

/// Create a basic test todo with sensible defaults
pub fn create_test_todo() -> Todo {
    let now = Utc::now();
    Todo {
        id: 1,
        subject: "Test Todo".to_string(),
        description: "A standard test todo with default values".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Create `count` todos with ids `1..=count`, oldest first
pub fn create_test_todos(count: usize) -> Vec<Todo> {
    let base = Utc::now() - Duration::hours(1);

    (1..=count as i64)
        .map(|id| {
            let at = base + Duration::seconds(id);
            Todo {
                id,
                subject: format!("Todo {id}"),
                description: format!("Description for todo {id}"),
                created_at: at,
                updated_at: at,
            }
        })
        .collect()
}

/// Create a standard create request
pub fn create_new_todo() -> CreateTodoRequest {
    CreateTodoRequest {
        subject: "New Todo".to_string(),
        description: "A freshly created todo".to_string(),
    }
}

/// Create a standard update request targeting `id`
pub fn create_update_todo(id: i64) -> UpdateTodoRequest {
    UpdateTodoRequest {
        id,
        subject: "Updated Todo".to_string(),
        description: "Updated description".to_string(),
    }
}

/// Create a delete request for the given ids
pub fn create_delete_todos(ids: &[i64]) -> DeleteTodoRequest {
    DeleteTodoRequest { ids: ids.to_vec() }
}

/// Subjects that exercise unusual but valid input
pub fn edge_case_subjects() -> Vec<String> {
    vec![
        "x".to_string(),
        "a".repeat(1000),
        "日本語のタスク".to_string(),
        "emoji 🚀 subject".to_string(),
        "quotes ' \" and ; semicolons".to_string(),
        "  padded  ".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_todos_have_increasing_ids() {
        let todos = create_test_todos(5);
        assert_eq!(todos.len(), 5);
        assert!(todos.windows(2).all(|w| w[0].id < w[1].id));
        assert!(todos.windows(2).all(|w| w[0].created_at < w[1].created_at));
    }

    #[test]
    fn test_edge_case_subjects_are_non_empty() {
        assert!(edge_case_subjects().iter().all(|s| !s.is_empty()));
    }
}
