use super::MessageResponse;
use axum::Json;

/// Handler for GET /api/posts/test - Tests post route
pub async fn posts_test() -> Json<MessageResponse> {
    Json(MessageResponse {
        msg: "posts Works".to_string(),
    })
}
