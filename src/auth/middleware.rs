//! Session guard
//!
//! Verifies the bearer token on protected routes and attaches the
//! authenticated user to the request before the handler runs.

use crate::api::handlers::AppState;
use crate::auth::jwt::validate_token;
use crate::core::error::{AppError, Result};
use crate::db::repository::Repository;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Identity attached to requests that passed the session guard
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub user_name: String,
    pub email: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Authentication middleware
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, request.headers()).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.id, "Session verified");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<AuthUser> {
    let token = bearer_token(headers).ok_or_else(|| {
        AppError::AuthenticationError("Missing authentication token".to_string())
    })?;

    let claims = validate_token(token, &state.token_keys)?;

    let user = state
        .user_repo
        .find_by_id(&claims.id)
        .await?
        .ok_or_else(|| AppError::AuthenticationError("User not found".to_string()))?;

    Ok(AuthUser {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::AuthenticationError("User not authenticated".to_string()))
    }
}
