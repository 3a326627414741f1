//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Todo equality with clear error messages
//! - Page ordering and cursor invariants
//! - Error classification

use todo_core::{Result, Todo, TodoError};

/// Assert todos are equal ignoring timestamps
pub fn assert_todo_equals(actual: &Todo, expected: &Todo) {
    assert_eq!(actual.id, expected.id, "Todo IDs don't match");
    assert_eq!(actual.subject, expected.subject, "Todo subjects don't match");
    assert_eq!(
        actual.description, expected.description,
        "Todo descriptions don't match"
    );
}

/// Assert todos are equal including exact timestamps
pub fn assert_todo_equals_exact(actual: &Todo, expected: &Todo) {
    assert_eq!(actual, expected, "Todos are not exactly equal");
}

/// Assert a page is in strictly descending id order
pub fn assert_descending_ids(page: &[Todo]) {
    for pair in page.windows(2) {
        assert!(
            pair[0].id > pair[1].id,
            "Page is not strictly descending: {} then {}",
            pair[0].id,
            pair[1].id
        );
    }
}

/// Assert every record in `page` lies strictly before the cursor
pub fn assert_page_after_cursor(page: &[Todo], prev_id: i64) {
    if prev_id > 0 {
        for todo in page {
            assert!(
                todo.id < prev_id,
                "Todo {} is not older than cursor {prev_id}",
                todo.id
            );
        }
    }
}

/// Assert a page contains exactly the given ids, in order
pub fn assert_page_ids(page: &[Todo], expected: &[i64]) {
    let actual: Vec<i64> = page.iter().map(|todo| todo.id).collect();
    assert_eq!(actual, expected, "Page ids don't match");
}

/// Assert the result is an error of the expected kind
pub fn assert_error_kind<T: std::fmt::Debug>(result: &Result<T>, predicate: fn(&TodoError) -> bool) {
    match result {
        Err(error) => assert!(predicate(error), "Unexpected error kind: {error:?}"),
        Ok(value) => panic!("Expected an error, got Ok({value:?})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::create_test_todos;

    #[test]
    fn test_assert_descending_ids_accepts_reversed_fixture() {
        let mut todos = create_test_todos(4);
        todos.reverse();
        assert_descending_ids(&todos);
        assert_page_ids(&todos, &[4, 3, 2, 1]);
        assert_page_after_cursor(&todos, 5);
    }

    #[test]
    #[should_panic(expected = "not strictly descending")]
    fn test_assert_descending_ids_rejects_ascending() {
        assert_descending_ids(&create_test_todos(2));
    }

    #[test]
    fn test_assert_error_kind() {
        let result: Result<()> = Err(TodoError::not_found_id(1));
        assert_error_kind(&result, TodoError::is_not_found);
    }
}
