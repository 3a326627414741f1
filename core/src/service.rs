use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::{error::Result, models::Todo};

/// Service trait for TODO persistence.
///
/// Every operation runs in its own short-lived transactional scope and takes
/// a caller-supplied cancellation token. When the token fires, the pending
/// transaction is abandoned without committing and the call returns
/// `TodoError::Cancelled`.
///
/// Implementations hold no in-process mutable state and must be safe to call
/// concurrently; the store's transaction isolation is the only concurrency
/// boundary.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Create a new TODO
    ///
    /// # Arguments
    /// * `subject` - Title of the TODO (emptiness is checked by the caller)
    /// * `description` - Free-form details, may be empty
    ///
    /// # Returns
    /// * `Ok(Todo)` - The stored record, re-read inside the creating transaction
    /// * `Err(TodoError::ConstraintViolation)` - If the store rejects the row
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn create(
        &self,
        cancel: &CancellationToken,
        subject: &str,
        description: &str,
    ) -> Result<Todo>;

    /// Read one page of TODOs in descending `id` order
    ///
    /// # Arguments
    /// * `prev_id` - Cursor; `0` starts from the most recent record
    /// * `size` - Maximum number of records to return
    ///
    /// # Returns
    /// * `Ok(Vec<Todo>)` - The page (may be empty)
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn read(&self, cancel: &CancellationToken, prev_id: i64, size: i64) -> Result<Vec<Todo>>;

    /// Rewrite the subject and description of an existing TODO
    ///
    /// # Returns
    /// * `Ok(Todo)` - The updated record with a refreshed `updated_at`
    /// * `Err(TodoError::NotFound)` - If `id` is zero or no row matches
    /// * `Err(TodoError::ConstraintViolation)` - If `subject` is empty
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn update(
        &self,
        cancel: &CancellationToken,
        id: i64,
        subject: &str,
        description: &str,
    ) -> Result<Todo>;

    /// Delete every TODO whose id is in `ids`
    ///
    /// An empty list is a successful no-op. Otherwise the call succeeds when at
    /// least one row was removed; there is no per-id feedback.
    ///
    /// # Returns
    /// * `Ok(())` - At least one row deleted, or `ids` was empty
    /// * `Err(TodoError::NotFound)` - If none of the ids matched
    /// * `Err(TodoError::Database)` - If the database operation fails
    async fn delete(&self, cancel: &CancellationToken, ids: &[i64]) -> Result<()>;

    /// Verify the backing store is reachable
    async fn health_check(&self, cancel: &CancellationToken) -> Result<()>;
}
