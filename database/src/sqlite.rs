use crate::common::{
    build_delete_query, build_page_query, row_to_todo, sqlx_error_to_todo_error,
    SELECT_TODO_BY_ID,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};
use std::{str::FromStr, time::Duration};
use todo_core::{
    cancel::run_cancellable,
    error::{Result, TodoError},
    models::Todo,
    service::TodoService,
};
use tokio_util::sync::CancellationToken;

/// Connection pool settings for [`SqliteTodoService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Maximum number of pooled connections (in-memory databases always use one)
    pub max_connections: u32,
    /// How long to wait for a free connection before failing
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// SQLite implementation of the TodoService trait
///
/// Holds nothing but a connection pool, so clones are cheap and share the
/// same underlying connections. All locking is left to SQLite.
#[derive(Debug, Clone)]
pub struct SqliteTodoService {
    pool: SqlitePool,
}

impl SqliteTodoService {
    /// Create a new SQLite service with default pool settings
    ///
    /// # Arguments
    /// * `database_url` - `:memory:`, a file path, or a `sqlite://` URL
    ///
    /// # Examples
    /// ```rust,no_run
    /// use database::SqliteTodoService;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // In-memory database for testing
    /// let service = SqliteTodoService::new(":memory:").await?;
    ///
    /// // File-based database
    /// let service = SqliteTodoService::new(".sqlite3/todo.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_settings(database_url, PoolSettings::default()).await
    }

    /// Create a new SQLite service with explicit pool settings
    ///
    /// # Returns
    /// * `Ok(SqliteTodoService)` - Successfully connected service
    /// * `Err(TodoError::Database)` - If the database cannot be opened
    pub async fn with_settings(database_url: &str, settings: PoolSettings) -> Result<Self> {
        let in_memory = is_in_memory(database_url);

        let pool = if in_memory {
            // Every in-memory connection would otherwise get its own private
            // database, so pin the pool to one long-lived connection.
            let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(sqlx_error_to_todo_error)?
                .journal_mode(SqliteJournalMode::Memory)
                .busy_timeout(Duration::from_secs(5));

            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .acquire_timeout(settings.acquire_timeout)
                .connect_with(connect_options)
                .await
                .map_err(sqlx_error_to_todo_error)?
        } else {
            let path = database_url
                .strip_prefix("sqlite://")
                .unwrap_or(database_url);

            let connect_options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5));

            SqlitePoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout)
                .connect_with(connect_options)
                .await
                .map_err(sqlx_error_to_todo_error)?
        };

        tracing::debug!(
            in_memory,
            max_connections = settings.max_connections,
            "SQLite pool opened"
        );

        Ok(Self { pool })
    }

    /// Run database migrations
    ///
    /// Creates the `todos` table when it does not exist yet. Safe to call on
    /// every startup.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| TodoError::Database(format!("Migration failed: {e}")))?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// Primarily intended for tests that need to inspect rows directly.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_by_id<'c, E>(executor: E, id: i64) -> Result<Option<Todo>>
    where
        E: sqlx::Executor<'c, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(SELECT_TODO_BY_ID)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(sqlx_error_to_todo_error)?;

        row.as_ref().map(row_to_todo).transpose()
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[async_trait]
impl TodoService for SqliteTodoService {
    async fn create(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        description: &str,
    ) -> Result<Todo> {
        run_cancellable(cancel, async {
            let now = Utc::now();
            let mut tx = self.pool.begin().await.map_err(sqlx_error_to_todo_error)?;

            let inserted = sqlx::query(
                "INSERT INTO todos (subject, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
            )
            .bind(subject)
            .bind(description)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_error_to_todo_error)?;

            let id = inserted.last_insert_rowid();

            // Read back what the store actually persisted before committing
            let todo = Self::fetch_by_id(&mut *tx, id)
                .await?
                .ok_or_else(|| TodoError::Database(format!("Inserted TODO {id} vanished")))?;

            tx.commit().await.map_err(sqlx_error_to_todo_error)?;

            tracing::debug!(id, "TODO created");
            Ok(todo)
        })
        .await
    }

    async fn read(&self, cancel: &CancellationToken, prev_id: i64, size: i64) -> Result<Vec<Todo>> {
        run_cancellable(cancel, async {
            let mut query_builder = build_page_query(prev_id, size);
            let rows = query_builder
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(sqlx_error_to_todo_error)?;

            tracing::debug!(prev_id, size, count = rows.len(), "TODO page read");
            rows.iter().map(row_to_todo).collect()
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
        if id == 0 {
            return Err(TodoError::not_found_id(id));
        }
        if subject.is_empty() {
            return Err(TodoError::empty_subject());
        }

        run_cancellable(cancel, async {
            let now = Utc::now();
            let mut tx = self.pool.begin().await.map_err(sqlx_error_to_todo_error)?;

            let updated = sqlx::query(
                "UPDATE todos SET subject = ?, description = ?, updated_at = ? WHERE id = ?",
            )
            .bind(subject)
            .bind(description)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(sqlx_error_to_todo_error)?;

            if updated.rows_affected() == 0 {
                // Dropping `tx` rolls it back
                return Err(TodoError::not_found_id(id));
            }

            let todo = Self::fetch_by_id(&mut *tx, id)
                .await?
                .ok_or_else(|| TodoError::not_found_id(id))?;

            tx.commit().await.map_err(sqlx_error_to_todo_error)?;

            tracing::debug!(id, "TODO updated");
            Ok(todo)
        })
        .await
    }

    async fn delete(&self, cancel: &CancellationToken, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        run_cancellable(cancel, async {
            let mut query_builder = build_delete_query(ids);
            let deleted = query_builder
                .build()
                .execute(&self.pool)
                .await
                .map_err(sqlx_error_to_todo_error)?;

            if deleted.rows_affected() == 0 {
                return Err(TodoError::none_deleted(ids));
            }

            tracing::debug!(
                requested = ids.len(),
                deleted = deleted.rows_affected(),
                "TODOs deleted"
            );
            Ok(())
        })
        .await
    }

    async fn health_check(&self, cancel: &CancellationToken) -> Result<()> {
        run_cancellable(cancel, async {
            sqlx::query("SELECT 1")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| TodoError::Database(format!("Health check failed: {e}")))?;
            Ok(())
        })
        .await
    }
}
