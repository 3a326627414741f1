//! Serialization utilities for the HTTP API
//!
//! Handles conversion between internal `Todo` values and the JSON payloads
//! exchanged with clients.

use crate::error::ApiError;
use chrono::{DateTime, FixedOffset};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use todo_core::{Todo, TodoError};

/// JSON shape of a TODO, timestamps rendered in the display offset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoView {
    pub id: i64,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl TodoView {
    pub fn from_todo(todo: &Todo, offset: &FixedOffset) -> Self {
        Self {
            id: todo.id,
            subject: todo.subject.clone(),
            description: todo.description.clone(),
            created_at: todo.created_at.with_timezone(offset),
            updated_at: todo.updated_at.with_timezone(offset),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoResponse {
    pub todo: TodoView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadTodoResponse {
    pub todos: Vec<TodoView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodoResponse {
    pub todo: TodoView,
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodoResponse {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthzResponse {
    pub message: String,
}

impl HealthzResponse {
    pub fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            message: "unavailable".to_string(),
        }
    }
}

/// Query parameters of `GET /todos`, kept as raw strings so parsing errors
/// surface as validation failures
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadTodoQuery {
    pub prev_id: Option<String>,
    pub size: Option<String>,
}

/// Deserialize a JSON request body
///
/// Content type is not checked; any body that parses is accepted.
pub fn deserialize_body<T>(body: &[u8]) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_slice(body)?)
}

/// Parse a display offset such as `+09:00`, `-05:30`, `Z` or `UTC`
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, TodoError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
        return FixedOffset::east_opt(0)
            .ok_or_else(|| TodoError::Internal("zero offset out of range".to_string()));
    }

    trimmed
        .parse::<FixedOffset>()
        .map_err(|e| TodoError::Configuration(format!("Invalid UTC offset '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use todo_core::{CreateTodoRequest, DeleteTodoRequest, UpdateTodoRequest};

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn test_todo_view_renders_offset() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let todo = Todo {
            id: 1,
            subject: "buy milk".to_string(),
            description: String::new(),
            created_at: at,
            updated_at: at,
        };

        let value = serde_json::to_value(TodoView::from_todo(&todo, &tokyo())).unwrap();
        assert_eq!(value["created_at"], "2024-06-01T21:00:00+09:00");
        assert_eq!(value["updated_at"], "2024-06-01T21:00:00+09:00");
        assert_eq!(value["description"], "");
    }

    #[test]
    fn test_delete_response_is_empty_object() {
        assert_eq!(
            serde_json::to_value(DeleteTodoResponse::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_deserialize_body_defaults_missing_fields() {
        let create: CreateTodoRequest = deserialize_body(br#"{"subject":"a"}"#).unwrap();
        assert_eq!(create.description, "");

        let update: UpdateTodoRequest = deserialize_body(br#"{"subject":"a"}"#).unwrap();
        assert_eq!(update.id, 0);

        let delete: DeleteTodoRequest = deserialize_body(b"{}").unwrap();
        assert!(delete.ids.is_empty());
    }

    #[test]
    fn test_deserialize_body_rejects_malformed_json() {
        let result: Result<CreateTodoRequest, _> = deserialize_body(b"{not json");
        assert!(matches!(result, Err(ApiError::BadRequest(_))));

        let result: Result<UpdateTodoRequest, _> = deserialize_body(br#"{"id":"seven"}"#);
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+09:00").unwrap(), tokyo());
        assert_eq!(
            parse_utc_offset("-05:30").unwrap(),
            FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
        );
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("Asia/Tokyo").is_err());
        assert!(parse_utc_offset("").is_err());
    }
}
