//! HTTP Server implementation
//!
//! This module provides the HTTP server using Axum framework with:
//! - Configurable host/port binding
//! - Graceful shutdown handling
//! - Request timeouts
//! - Health check endpoint
//! - CORS support

use crate::api::handlers::AppState;
use crate::api::middleware::{
    security_headers_middleware, trace_id_middleware, SecurityHeadersConfig,
};
use crate::api::routes::build_api_routes;
use crate::auth::jwt::TokenKeys;
use crate::core::config::{SecurityConfig, ServerConfig};
use crate::core::Config;
use crate::db::manager::DatabaseManager;
use crate::db::repository::UserRepository;
use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration and database manager
    pub fn new(config: Config, db: Arc<DatabaseManager>) -> anyhow::Result<Self> {
        let state = AppState {
            user_repo: Arc::new(UserRepository::new(db)),
            token_keys: Arc::new(TokenKeys::new(
                &config.security.jwt_secret,
                config.security.token_ttl,
            )),
            bcrypt_cost: config.security.bcrypt_cost,
        };

        let router = build_router(state, &config.security)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout,
            )));

        Ok(Self {
            router,
            config: config.server,
        })
    }

    /// Start the HTTP server and listen for requests
    ///
    /// This method will block until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            request_timeout = self.config.request_timeout,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Build the full application router: API routes, health check and global middleware
pub fn build_router(state: AppState, security: &SecurityConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(build_api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&security.allowed_origins))
                .layer(middleware::from_fn(trace_id_middleware))
                .layer(middleware::from_fn_with_state(
                    SecurityHeadersConfig::from(security),
                    security_headers_middleware,
                )),
        )
}

/// Build CORS layer from allowed origins configuration
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    use tower_http::cors::Any;

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Health check endpoint handler
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().timestamp(),
    }))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::TRACE_ID_HEADER;
    use crate::auth::jwt::{generate_token, Claims};
    use crate::auth::models::{CurrentUser, LoginResponse};
    use crate::db::models::User;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use tower::util::ServiceExt;

    const SECRET: &str = "test-secret";

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: SECRET.to_string(),
            token_ttl: 3600,
            bcrypt_cost: 4,
            allowed_origins: vec!["*".to_string()],
            enable_hsts: false,
            hsts_max_age: 31536000,
        }
    }

    fn test_app() -> (Router, AppState) {
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let state = AppState {
            user_repo: Arc::new(UserRepository::new(db)),
            token_keys: Arc::new(TokenKeys::new(SECRET, 3600)),
            bcrypt_cost: 4,
        };
        (build_router(state.clone(), &security()), state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_with_auth(uri: &str, authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn signup_body() -> Value {
        json!({
            "email": "a@b.com",
            "password": "secret123",
            "user_name": "ab",
            "first_name": "Ada",
            "last_name": "Byron",
        })
    }

    async fn signup_and_login(app: &Router) -> String {
        let (status, _) = send(app, post_json("/api/users/signup", signup_body())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            app,
            post_json(
                "/api/users/login",
                json!({ "email": "a@b.com", "password": "secret123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let login: LoginResponse = serde_json::from_value(body).unwrap();
        login.token
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await;
        let value = response.0;

        assert_eq!(value["status"], "ok");
        assert!(value["version"].is_string());
        assert!(value["timestamp"].is_number());
    }

    #[tokio::test]
    async fn test_placeholder_routes() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get_with_auth("/api/posts/test", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "msg": "posts Works" }));

        let (status, body) = send(&app, get_with_auth("/api/profile/test", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "msg": "profile Works" }));
    }

    #[tokio::test]
    async fn test_responses_carry_middleware_headers() {
        let (app, _) = test_app();
        let response = app
            .oneshot(get_with_auth("/api/posts/test", None))
            .await
            .unwrap();

        assert!(response.headers().contains_key(TRACE_ID_HEADER));
        assert_eq!(
            response.headers().get("X-Content-Type-Options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_signup_persists_hashed_password() {
        let (app, state) = test_app();

        let (status, body) = send(&app, post_json("/api/users/signup", signup_body())).await;
        assert_eq!(status, StatusCode::OK);

        let created: User = serde_json::from_value(body).unwrap();
        assert_eq!(created.email, "a@b.com");
        assert_eq!(created.user_name, "ab");
        assert_ne!(created.password, "secret123");
        assert!(created.avatar.starts_with("//www.gravatar.com/avatar/"));
        assert!(created.avatar.ends_with("?s=200&r=pg&d=mm"));

        let stored = state.user_repo.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(stored.id, created.id);
        assert_ne!(stored.password, "secret123");
        assert!(bcrypt::verify("secret123", &stored.password).unwrap());
        assert_eq!(state.user_repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let (app, state) = test_app();

        let (status, _) = send(&app, post_json("/api/users/signup", signup_body())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, post_json("/api/users/signup", signup_body())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "email": "Email already Exists" }));
        assert_eq!(state.user_repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_signup_missing_field() {
        let (app, state) = test_app();

        let mut body = signup_body();
        body.as_object_mut().unwrap().remove("user_name");

        let (status, errors) = send(&app, post_json("/api/users/signup", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors["user_name"], "User name field is required");
        assert_eq!(state.user_repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_signup_padded_duplicate_email() {
        let (app, state) = test_app();

        let (status, _) = send(&app, post_json("/api/users/signup", signup_body())).await;
        assert_eq!(status, StatusCode::OK);

        let mut body = signup_body();
        body["email"] = json!(" a@b.com ");
        let (status, errors) = send(&app, post_json("/api/users/signup", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, json!({ "email": "Email already Exists" }));
        assert_eq!(state.user_repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_signup_stores_trimmed_email() {
        let (app, _) = test_app();

        let mut body = signup_body();
        body["email"] = json!("  a@b.com\t");
        let (status, created) = send(&app, post_json("/api/users/signup", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["email"], "a@b.com");

        let (status, _) = send(
            &app,
            post_json(
                "/api/users/login",
                json!({ "email": " a@b.com ", "password": "secret123" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_signup_null_field_is_reported() {
        let (app, state) = test_app();

        let mut body = signup_body();
        body["user_name"] = Value::Null;

        let (status, errors) = send(&app, post_json("/api/users/signup", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, json!({ "user_name": "User name field is required" }));
        assert_eq!(state.user_repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_login_non_string_email_is_reported() {
        let (app, _) = test_app();

        let (status, errors) = send(
            &app,
            post_json("/api/users/login", json!({ "email": 5, "password": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, json!({ "email": "Email field is required" }));
    }

    #[tokio::test]
    async fn test_signup_keeps_optional_contact_fields() {
        let (app, _) = test_app();

        let mut body = signup_body();
        body["address"] = json!("1 Main St");
        body["phone"] = json!("555-0100");

        let (status, created) = send(&app, post_json("/api/users/signup", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["address"], "1 Main St");
        assert_eq!(created["phone"], "555-0100");
    }

    #[tokio::test]
    async fn test_login_issues_bearer_token() {
        let (app, state) = test_app();
        let token = signup_and_login(&app).await;

        let raw = token.strip_prefix("Bearer ").unwrap();
        let claims: Claims = crate::auth::jwt::validate_token(raw, &state.token_keys).unwrap();
        let stored = state.user_repo.find_by_email("a@b.com").await.unwrap().unwrap();

        assert_eq!(claims.id, stored.id);
        assert_eq!(claims.avatar, stored.avatar);
        assert!(claims.name.is_none());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let (app, _) = test_app();
        send(&app, post_json("/api/users/signup", signup_body())).await;

        let (status, body) = send(
            &app,
            post_json(
                "/api/users/login",
                json!({ "email": "a@b.com", "password": "wrong-pass" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "password": "Password is Incorrect" }));
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let (app, _) = test_app();

        let (status, body) = send(
            &app,
            post_json(
                "/api/users/login",
                json!({ "email": "nobody@b.com", "password": "secret123" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "email": "User not Found" }));
    }

    #[tokio::test]
    async fn test_login_validation() {
        let (app, _) = test_app();

        let (status, body) = send(&app, post_json("/api/users/login", json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["email"], "Email field is required");
        assert_eq!(body["password"], "Password field is required");
    }

    #[tokio::test]
    async fn test_current_user_with_valid_token() {
        let (app, state) = test_app();
        let token = signup_and_login(&app).await;

        let (status, body) =
            send(&app, get_with_auth("/api/users/current", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);

        let stored = state.user_repo.find_by_email("a@b.com").await.unwrap().unwrap();
        let current: CurrentUser = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(
            current,
            CurrentUser {
                id: stored.id,
                user_name: "ab".to_string(),
                email: "a@b.com".to_string(),
            }
        );
        assert_eq!(body.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_current_user_rejects_missing_or_bad_tokens() {
        let (app, _) = test_app();
        signup_and_login(&app).await;

        for auth in [None, Some("Bearer not.a.token"), Some("Basic YWI6Y2Q=")] {
            let (status, body) = send(&app, get_with_auth("/api/users/current", auth)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(body.get("email").is_none());
            assert_eq!(body["error"], "AuthenticationError");
        }
    }

    #[tokio::test]
    async fn test_current_user_rejects_foreign_signature() {
        let (app, state) = test_app();
        signup_and_login(&app).await;
        let stored = state.user_repo.find_by_email("a@b.com").await.unwrap().unwrap();

        let forged = generate_token(
            &stored.id,
            None,
            &stored.avatar,
            &TokenKeys::new("other-secret", 3600),
        )
        .unwrap();

        let (status, _) = send(
            &app,
            get_with_auth("/api/users/current", Some(&format!("Bearer {}", forged))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_user_rejects_unknown_subject() {
        let (app, state) = test_app();

        let token = generate_token("ghost", None, "", &state.token_keys).unwrap();
        let (status, _) = send(
            &app,
            get_with_auth("/api/users/current", Some(&format!("Bearer {}", token))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_guarded() {
        let (app, _) = test_app();
        let (status, _) = send(&app, get_with_auth("/api/users/unknown", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
