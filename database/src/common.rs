use chrono::{DateTime, Utc};
use sqlx::{error::ErrorKind, sqlite::SqliteRow, Row};
use todo_core::{
    error::{Result, TodoError},
    models::Todo,
};

/// Column list shared by every query that materializes a `Todo`
pub const TODO_COLUMNS: &str = "id, subject, description, created_at, updated_at";

/// Point lookup used to re-read a row inside the writing transaction
pub const SELECT_TODO_BY_ID: &str =
    "SELECT id, subject, description, created_at, updated_at FROM todos WHERE id = ?";

/// SQLite extended result codes that signal a constraint failure
const SQLITE_CONSTRAINT: &str = "19";
const SQLITE_CONSTRAINT_CHECK: &str = "275";
const SQLITE_CONSTRAINT_NOTNULL: &str = "1299";

/// Convert SQLite row to Todo model
pub fn row_to_todo(row: &SqliteRow) -> Result<Todo> {
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| TodoError::Database(format!("Invalid created_at in database: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| TodoError::Database(format!("Invalid updated_at in database: {e}")))?;

    Ok(Todo {
        id: row.get("id"),
        subject: row.get("subject"),
        description: row.get("description"),
        created_at,
        updated_at,
    })
}

/// Convert SQLx error to TodoError
pub fn sqlx_error_to_todo_error(err: sqlx::Error) -> TodoError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().unwrap_or_default();
            let message = db_err.message();

            let is_constraint = matches!(
                db_err.kind(),
                ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
            ) || code == SQLITE_CONSTRAINT
                || code == SQLITE_CONSTRAINT_CHECK
                || code == SQLITE_CONSTRAINT_NOTNULL
                || message.contains("constraint failed");

            if is_constraint {
                TodoError::ConstraintViolation(message.to_string())
            } else {
                TodoError::Database(format!("Database error: {message}"))
            }
        }
        sqlx::Error::RowNotFound => TodoError::NotFound("Row not found".to_string()),
        sqlx::Error::PoolTimedOut => TodoError::Database("Connection pool timeout".to_string()),
        sqlx::Error::PoolClosed => TodoError::Database("Connection pool closed".to_string()),
        sqlx::Error::Io(io_err) => TodoError::Database(format!("Database I/O error: {io_err}")),
        _ => TodoError::Database(format!("Database operation failed: {err}")),
    }
}

/// Build the single-statement bulk delete for `ids`.
///
/// Ids are bound as parameters; callers must not pass an empty slice since
/// `IN ()` is not valid SQL. One parameter is bound per id, so a list longer
/// than the linked SQLite's bound-variable limit (32766 by default, raised in
/// the bundled build) fails as a `Database` error and deletes nothing.
pub fn build_delete_query(ids: &[i64]) -> sqlx::QueryBuilder<'_, sqlx::Sqlite> {
    let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new("DELETE FROM todos WHERE id IN (");

    let mut separated = query_builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    query_builder
}

/// Build the page query for a cursor read.
///
/// `prev_id == 0` reads from the newest record; any other value reads the
/// records strictly older than it.
pub fn build_page_query(prev_id: i64, size: i64) -> sqlx::QueryBuilder<'static, sqlx::Sqlite> {
    let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new(format!("SELECT {TODO_COLUMNS} FROM todos"));

    if prev_id > 0 {
        query_builder.push(" WHERE id < ");
        query_builder.push_bind(prev_id);
    }

    query_builder.push(" ORDER BY id DESC LIMIT ");
    query_builder.push_bind(size);

    query_builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn test_build_delete_query_binds_every_id() {
        let ids = [3, 5, 8];
        let mut query_builder = build_delete_query(&ids);
        let query = query_builder.build();
        assert_eq!(query.sql(), "DELETE FROM todos WHERE id IN (?, ?, ?)");
    }

    #[test]
    fn test_build_delete_query_single_id() {
        let ids = [42];
        let mut query_builder = build_delete_query(&ids);
        assert_eq!(query_builder.build().sql(), "DELETE FROM todos WHERE id IN (?)");
    }

    #[test]
    fn test_build_page_query_shapes() {
        let mut first_page = build_page_query(0, 10);
        assert_eq!(
            first_page.build().sql(),
            "SELECT id, subject, description, created_at, updated_at FROM todos ORDER BY id DESC LIMIT ?"
        );

        let mut next_page = build_page_query(17, 10);
        assert_eq!(
            next_page.build().sql(),
            "SELECT id, subject, description, created_at, updated_at FROM todos WHERE id < ? ORDER BY id DESC LIMIT ?"
        );
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = sqlx_error_to_todo_error(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_errors_map_to_database() {
        assert!(sqlx_error_to_todo_error(sqlx::Error::PoolTimedOut).is_database());
        assert!(sqlx_error_to_todo_error(sqlx::Error::PoolClosed).is_database());

        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = sqlx_error_to_todo_error(sqlx::Error::Io(io));
        assert!(err.is_database());
        assert!(!err.is_not_found());
    }
}
