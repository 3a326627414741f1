//! Random test data generators using the fake crate
//!
//! Provides realistic random data including:
//! - Subjects and descriptions
//! - Fully populated todos
//! - Property-based testing strategies for payloads and page requests

use chrono::{Duration, Utc};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use todo_core::{CreateTodoRequest, ReadTodoRequest, Todo};

/// Generate a realistic todo subject
pub fn generate_subject() -> String {
    Sentence(2..6).fake()
}

/// Generate a realistic todo description, sometimes empty
pub fn generate_description() -> String {
    if rand::thread_rng().gen_bool(0.2) {
        String::new()
    } else {
        Paragraph(1..3).fake()
    }
}

/// Generate a random todo with realistic data
pub fn generate_random_todo() -> Todo {
    let id: i64 = (1..99999).fake();
    let created_at = Utc::now() - Duration::minutes((0..10_000).fake());
    let updated_at = if rand::thread_rng().gen_bool(0.5) {
        created_at + Duration::minutes((1..600).fake())
    } else {
        created_at
    };

    Todo {
        id,
        subject: generate_subject(),
        description: generate_description(),
        created_at,
        updated_at,
    }
}

/// Configurable todo generator producing ids in a fixed sequence
pub struct TodoGenerator {
    pub subject_prefix: String,
    pub next_id: i64,
}

impl Default for TodoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoGenerator {
    pub fn new() -> Self {
        Self {
            subject_prefix: "TEST".to_string(),
            next_id: 1,
        }
    }

    /// Generate the next todo; ids increase by one on every call
    pub fn generate(&mut self) -> Todo {
        let id = self.next_id;
        self.next_id += 1;

        let now = Utc::now();
        Todo {
            id,
            subject: format!("{} {id}: {}", self.subject_prefix, generate_subject()),
            description: generate_description(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn generate_many(&mut self, count: usize) -> Vec<Todo> {
        (0..count).map(|_| self.generate()).collect()
    }
}

/// Proptest strategy for non-empty subjects
pub fn subject_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?-]{1,64}"
}

/// Proptest strategy for descriptions, including the empty string
pub fn description_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z0-9 \n,.]{1,200}"]
}

/// Proptest strategy for create payloads
pub fn create_request_strategy() -> impl Strategy<Value = CreateTodoRequest> {
    (subject_strategy(), description_strategy())
        .prop_map(|(subject, description)| CreateTodoRequest { subject, description })
}

/// Proptest strategy for page requests against a store holding up to `max_id` records
pub fn read_request_strategy(max_id: i64) -> impl Strategy<Value = ReadTodoRequest> {
    (0..=max_id + 1, 1..=max_id.max(1) + 2)
        .prop_map(|(prev_id, size)| ReadTodoRequest { prev_id, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_subjects_are_non_empty() {
        for _ in 0..20 {
            assert!(!generate_subject().is_empty());
            let todo = generate_random_todo();
            assert!(todo.updated_at >= todo.created_at);
        }
    }

    #[test]
    fn test_generator_sequence() {
        let mut generator = TodoGenerator::new();
        let todos = generator.generate_many(3);
        let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(todos[0].subject.starts_with("TEST 1:"));
    }

    proptest! {
        #[test]
        fn prop_subjects_never_empty(subject in subject_strategy()) {
            prop_assert!(!subject.is_empty());
        }

        #[test]
        fn prop_read_requests_stay_in_range(request in read_request_strategy(20)) {
            prop_assert!(request.prev_id >= 0 && request.prev_id <= 21);
            prop_assert!(request.size >= 1);
        }
    }
}
