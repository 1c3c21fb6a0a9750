//! User API handlers: signup, login and the current-user endpoint

use crate::api::handlers::AppState;
use crate::auth::avatar::{gravatar_url, AvatarOptions};
use crate::auth::jwt::generate_token;
use crate::auth::middleware::AuthUser;
use crate::auth::models::{CurrentUser, LoginRequest, LoginResponse, SignupRequest};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::validation::{validate_login, validate_signup, ValidationErrors};
use crate::core::error::{AppError, Result};
use crate::db::models::User;
use crate::db::repository::Repository;
use axum::{extract::State, Json};
use uuid::Uuid;

fn email_taken() -> AppError {
    AppError::Conflict(ValidationErrors::single("email", "Email already Exists"))
}

/// Handler for POST /api/users/signup - Register user
pub async fn signup(
    State(state): State<AppState>,
    Json(mut req): Json<SignupRequest>,
) -> Result<Json<User>> {
    req.email = req.email.trim().to_string();

    tracing::info!(email = %req.email, user_name = %req.user_name, "Signup attempt");

    let errors = validate_signup(&req);
    if !errors.is_valid() {
        return Err(AppError::Validation(errors));
    }

    if state.user_repo.find_by_email(&req.email).await?.is_some() {
        tracing::info!(email = %req.email, "Signup rejected, email already registered");
        return Err(email_taken());
    }

    let avatar = gravatar_url(&req.email, &AvatarOptions::default());
    let password = hash_password(&req.password, state.bcrypt_cost).await?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        first_name: req.first_name,
        last_name: req.last_name,
        user_name: req.user_name,
        email: req.email,
        password,
        address: req.address,
        phone: req.phone,
        avatar,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    // A concurrent signup can pass the lookup above; the unique index decides
    match state.user_repo.create(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, email = %user.email, "User registered successfully");
            Ok(Json(user))
        }
        Err(e) if e.is_unique_violation() => {
            tracing::info!(email = %user.email, "Signup lost race on email uniqueness");
            Err(email_taken())
        }
        Err(e) => {
            tracing::error!(email = %user.email, error = %e, "Failed to persist new user");
            Err(e)
        }
    }
}

/// Handler for POST /api/users/login - Login user and return a bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(mut req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    req.email = req.email.trim().to_string();

    tracing::info!(email = %req.email, "Login attempt");

    let errors = validate_login(&req);
    if !errors.is_valid() {
        return Err(AppError::Validation(errors));
    }

    let user = state
        .user_repo
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound(ValidationErrors::single("email", "User not Found")))?;

    if !verify_password(&req.password, &user.password).await? {
        tracing::warn!(user_id = %user.id, "Invalid password");
        return Err(AppError::Validation(ValidationErrors::single(
            "password",
            "Password is Incorrect",
        )));
    }

    // Users carry no display name, so the `name` claim is never set
    let token = generate_token(&user.id, None, &user.avatar, &state.token_keys)?;

    tracing::info!(user_id = %user.id, "Login successful");

    Ok(Json(LoginResponse {
        success: true,
        token: format!("Bearer {}", token),
    }))
}

/// Handler for GET /api/users/current - Return the authenticated user
pub async fn current(user: AuthUser) -> Json<CurrentUser> {
    Json(CurrentUser {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
    })
}
