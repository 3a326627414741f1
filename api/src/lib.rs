//! TODO HTTP API
//!
//! This crate exposes a [`TodoService`] over JSON/HTTP using axum.
//!
//! # Overview
//!
//! - `POST /todos` creates, `GET /todos` pages, `PUT /todos` updates and
//!   `DELETE /todos` bulk-deletes TODOs
//! - `GET /healthz` reports liveness, optionally pinging the store
//! - Core errors map onto HTTP status codes with generic JSON bodies
//! - Each request runs under its own cancellation token
//!
//! # Usage
//!
//! ```no_run
//! use mocks::MockTodoService;
//! use std::sync::Arc;
//! use todo_api::{ServerOptions, TodoServer};
//!
//! async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
//!     // In real usage this is database::SqliteTodoService
//!     let service = Arc::new(MockTodoService::new());
//!     let server = TodoServer::new(service, ServerOptions::default());
//!     server.serve("127.0.0.1:8080").await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handler;
pub mod recovery;
pub mod request_logger;
pub mod serialization;
pub mod server;

// Re-export key types for easier usage
pub use error::ApiError;
pub use handler::{RequestScope, TodoHandler};
pub use request_logger::MAX_BODY_BYTES;
pub use serialization::*;
pub use server::{AppState, ServerOptions, TodoServer};

// Re-export core types for external consumers
pub use todo_core::{
    CreateTodoRequest, DeleteTodoRequest, ReadTodoRequest, Todo, TodoError, TodoService,
    UpdateTodoRequest,
};
