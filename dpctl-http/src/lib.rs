//! # dpctl-http
//!
//! REST API layer for dpctl.
//!
//! This crate provides:
//! - The axum router and request handlers over the core services
//! - Request/response DTOs with validated domain conversions
//! - Daemon configuration (defaults, YAML file, env overrides)
//! - The server lifecycle with signal-driven graceful shutdown

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use routes::router;
pub use server::serve;
pub use state::AppState;
