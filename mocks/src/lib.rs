//! Mock implementations and test utilities for the TODO backend
//!
//! This crate provides the testing infrastructure shared by the other crates:
//! - An in-memory `TodoService` with error injection and call tracking
//! - Builders and fixtures for `Todo` values and request payloads
//! - Custom assertion helpers
//! - Random data generators and property-based testing strategies
//! - Contract tests that every `TodoService` implementation must pass

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod service;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use service::MockTodoService;
