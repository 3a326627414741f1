//! Database crate for the TODO backend
//!
//! This crate provides the SQLite implementation of the `TodoService` trait:
//! transactional create/update with read-after-write inside the transaction,
//! cursor-paginated reads, and single-statement bulk deletes.
//!
//! # Features
//!
//! - SQLite with WAL mode for file databases
//! - Embedded migrations that bootstrap the `todos` table
//! - Connection pooling with configurable size and acquire timeout
//! - sqlx errors translated into the `TodoError` taxonomy in one place
//! - Cooperative cancellation: a fired token rolls back the open transaction
//!
//! # Usage
//!
//! ```rust
//! use database::SqliteTodoService;
//! use todo_core::{service::TodoService, CancellationToken};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = SqliteTodoService::new(":memory:").await?;
//!     service.migrate().await?;
//!
//!     let cancel = CancellationToken::new();
//!     let todo = service.create(&cancel, "buy milk", "").await?;
//!     let page = service.read(&cancel, 0, 10).await?;
//!     assert_eq!(page[0].id, todo.id);
//!
//!     Ok(())
//! }
//! ```

mod common;
mod sqlite;

pub use sqlite::{PoolSettings, SqliteTodoService};

// Re-export commonly used types from todo-core for convenience
pub use todo_core::{
    error::{Result, TodoError},
    models::Todo,
    service::TodoService,
    CancellationToken,
};
