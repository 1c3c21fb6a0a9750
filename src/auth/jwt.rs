//! JWT token generation and validation

use crate::core::error::{AppError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued session token, in seconds
pub const DEFAULT_TOKEN_TTL: u64 = 3600;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub avatar: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signing material for session tokens
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: u64,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Generate a signed token for the given identity
pub fn generate_token(
    id: &str,
    name: Option<String>,
    avatar: &str,
    keys: &TokenKeys,
) -> Result<String> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::seconds(keys.ttl as i64))
        .ok_or_else(|| AppError::AuthenticationError("Failed to calculate expiration".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        id: id.to_string(),
        name,
        avatar: avatar.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration,
    };

    encode(&Header::default(), &claims, &keys.encoding)
        .map_err(|e| AppError::AuthenticationError(format!("Failed to generate token: {}", e)))
}

/// Validate a token's signature and expiry and extract its claims
pub fn validate_token(token: &str, keys: &TokenKeys) -> Result<Claims> {
    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())
        .map_err(|e| AppError::AuthenticationError(format!("Invalid token: {}", e)))?;

    Ok(token_data.claims)
}
