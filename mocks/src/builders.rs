//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - Todo construction with sensible defaults
//! - Create and update request payloads

use chrono::{DateTime, Duration, Utc};
use todo_core::{CreateTodoRequest, Todo, UpdateTodoRequest};

/// Builder for constructing Todo instances in tests
pub struct TodoBuilder {
    todo: Todo,
}

impl Default for TodoBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            todo: Todo {
                id: 1,
                subject: "Test Todo".to_string(),
                description: "A test todo".to_string(),
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.todo.id = id;
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.todo.subject = subject.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.todo.description = description.into();
        self
    }

    /// Set both timestamps to `created_at`
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.todo.created_at = created_at;
        self.todo.updated_at = created_at;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.todo.updated_at = updated_at;
        self
    }

    /// Mark the todo as modified some time after creation
    pub fn updated(mut self) -> Self {
        self.todo.updated_at = self.todo.created_at + Duration::minutes(5);
        self
    }

    /// Build the final Todo
    pub fn build(self) -> Todo {
        self.todo
    }
}

/// Builder for constructing CreateTodoRequest instances
pub struct CreateTodoRequestBuilder {
    request: CreateTodoRequest,
}

impl Default for CreateTodoRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateTodoRequestBuilder {
    pub fn new() -> Self {
        Self {
            request: CreateTodoRequest {
                subject: "New Todo".to_string(),
                description: String::new(),
            },
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.request.subject = subject.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.request.description = description.into();
        self
    }

    pub fn build(self) -> CreateTodoRequest {
        self.request
    }
}

/// Builder for constructing UpdateTodoRequest instances
pub struct UpdateTodoRequestBuilder {
    request: UpdateTodoRequest,
}

impl UpdateTodoRequestBuilder {
    /// Start an update for `id` with a placeholder subject
    pub fn new(id: i64) -> Self {
        Self {
            request: UpdateTodoRequest {
                id,
                subject: "Updated Todo".to_string(),
                description: String::new(),
            },
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.request.subject = subject.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.request.description = description.into();
        self
    }

    pub fn build(self) -> UpdateTodoRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_todo_builder() {
        let todo = TodoBuilder::new()
            .with_id(42)
            .with_subject("Custom subject")
            .updated()
            .build();

        assert_eq!(todo.id, 42);
        assert_eq!(todo.subject, "Custom subject");
        assert!(todo.was_updated());
    }

    #[test]
    fn test_request_builders() {
        let create = CreateTodoRequestBuilder::new()
            .with_description("details")
            .build();
        assert_eq!(create.subject, "New Todo");
        assert_eq!(create.description, "details");

        let update = UpdateTodoRequestBuilder::new(3).with_subject("renamed").build();
        assert_eq!(update.id, 3);
        assert_eq!(update.subject, "renamed");
    }
}
