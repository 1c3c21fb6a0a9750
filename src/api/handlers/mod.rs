pub mod posts;
pub mod profile;

pub use posts::posts_test;
pub use profile::profile_test;

use crate::auth::jwt::TokenKeys;
use crate::db::repository::UserRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub token_keys: Arc<TokenKeys>,
    pub bcrypt_cost: u32,
}

/// Static `{msg}` body returned by placeholder routes
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}
