//! API routes

use crate::api::handlers::{posts_test, profile_test, AppState};
use crate::auth::handlers::{current, login, signup};
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// Build the `/api` route groups
pub fn build_api_routes(state: AppState) -> Router {
    let posts = Router::new().route("/test", get(posts_test));

    let profile = Router::new().route("/test", get(profile_test));

    // Only `/current` sits behind the session guard
    let users = Router::new()
        .route("/current", get(current))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .route("/signup", post(signup))
        .route("/login", post(login));

    Router::new()
        .nest("/api/posts", posts)
        .nest("/api/profile", profile)
        .nest("/api/users", users)
        .with_state(state)
}
