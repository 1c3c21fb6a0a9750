use super::MessageResponse;
use axum::Json;

/// Handler for GET /api/profile/test - Tests profile route
pub async fn profile_test() -> Json<MessageResponse> {
    Json(MessageResponse {
        msg: "profile Works".to_string(),
    })
}
