//! Authentication module
//!
//! This module provides:
//! - User signup and login
//! - JWT token generation and validation
//! - Password hashing and verification
//! - Input validation
//! - The session guard middleware

pub mod avatar;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod validation;

pub use handlers::{current, login, signup};
pub use jwt::{generate_token, validate_token, Claims, TokenKeys};
pub use middleware::{authenticate, AuthUser};
pub use password::{hash_password, verify_password};
pub use validation::ValidationErrors;
