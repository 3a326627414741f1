use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Page size applied when a read request does not specify one (or asks for zero)
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A TODO record as persisted in the store.
///
/// `id` is assigned by the store on creation and doubles as the pagination
/// cursor: reads always come back in strictly descending `id` order.
///
/// # Examples
///
/// ```rust
/// use todo_core::models::Todo;
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let todo = Todo {
///     id: 7,
///     subject: "buy milk".to_string(),
///     description: String::new(),
///     created_at: now,
///     updated_at: now,
/// };
///
/// assert!(!todo.was_updated());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    /// Auto-increment primary key
    pub id: i64,
    /// Short title, never empty once persisted
    pub subject: String,
    /// Free-form details, may be empty
    pub description: String,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Whether the record has been modified since it was created
    pub fn was_updated(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// Request payload for creating a TODO
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Cursor-based page request.
///
/// `prev_id == 0` starts from the most recent record; otherwise only records
/// with an `id` strictly below `prev_id` are returned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadTodoRequest {
    #[serde(default)]
    pub prev_id: i64,
    #[serde(default = "default_page_size")]
    pub size: i64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ReadTodoRequest {
    fn default() -> Self {
        Self {
            prev_id: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Request payload for updating a TODO. Both text fields are always rewritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Request payload for deleting TODOs in bulk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteTodoRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ids: Vec<i64>,
}

/// Decode an explicit JSON `null` as the field's zero value, the same as an
/// absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
