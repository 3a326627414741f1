//! TODO server library
//!
//! Configuration loading, logging setup and store bootstrap for the
//! `todo-server` binary.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::Config;
pub use setup::{create_server, create_service, ensure_database_directory, initialize_app};
pub use telemetry::{init_telemetry, log_shutdown_info, log_startup_info};
