//! Social API Backend Library
//!
//! REST backend for a social/profile application: user signup and login with
//! bcrypt password digests, JWT session tokens, and a bearer-token guard on
//! the current-user endpoint.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::{AppError, Config};
pub use api::ApiServer;
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
