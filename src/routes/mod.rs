use axum::response::{IntoResponse, Json as AxumJson};

pub mod donations;

pub async fn health_check() -> impl IntoResponse {
    AxumJson(serde_json::json!({ "status": "ok", "message": "Server is running" }))
}
