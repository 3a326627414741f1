//! TODO Core Library
//!
//! This crate provides the domain model, error taxonomy and service trait for
//! the TODO backend. All other crates depend on the types and interfaces
//! defined here.
//!
//! # Architecture
//!
//! - [`models`] - The `Todo` entity and request payloads
//! - [`error`] - Error types and result handling
//! - [`service`] - Service trait implemented by the persistence layer
//! - [`validation`] - Boundary-layer request validation
//! - [`cancel`] - Cooperative cancellation of in-flight operations
//!
//! # Example
//!
//! ```rust
//! use todo_core::{models::UpdateTodoRequest, validation::TodoValidator};
//!
//! let request = UpdateTodoRequest {
//!     id: 1,
//!     subject: "water the plants".to_string(),
//!     description: String::new(),
//! };
//!
//! TodoValidator::validate_update(&request).unwrap();
//! ```

pub mod cancel;
pub mod error;
pub mod models;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use cancel::run_cancellable;
pub use error::{Result, TodoError};
pub use models::{
    CreateTodoRequest, DeleteTodoRequest, ReadTodoRequest, Todo, UpdateTodoRequest,
    DEFAULT_PAGE_SIZE,
};
pub use service::TodoService;
pub use tokio_util::sync::CancellationToken;
pub use validation::TodoValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
