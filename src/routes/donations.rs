use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson},
};
use crate::AppState;
use crate::db::models::{AppendResponse, ListResponse, NewDonation};

pub async fn list_donations(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list().await {
        Ok(donations) => {
            tracing::info!("Fetched {} donations", donations.len());
            AxumJson(ListResponse::ok(donations)).into_response()
        }
        Err(e) => {
            tracing::error!("Error reading donations: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                AxumJson(ListResponse::failed("Failed to read donations")),
            )
                .into_response()
        }
    }
}

pub async fn create_donation(
    State(state): State<AppState>,
    payload: Result<Json<NewDonation>, JsonRejection>,
) -> impl IntoResponse {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("Rejected donation payload: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                AxumJson(AppendResponse::failed("Invalid request body")),
            )
                .into_response();
        }
    };

    match state.store.append(&req).await {
        Ok(()) => {
            tracing::info!(
                id = ?req.id.as_ref().map(ToString::to_string),
                name = ?req.name.as_ref().map(ToString::to_string),
                amount = ?req.amount.as_ref().map(ToString::to_string),
                "Donation saved"
            );
            AxumJson(AppendResponse::ok("Donation saved successfully")).into_response()
        }
        Err(e) if e.is_validation() => (
            e.status_code(),
            AxumJson(AppendResponse::failed("Missing required fields")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error saving donation: {}", e);
            (
                e.status_code(),
                AxumJson(AppendResponse::failed("Failed to save donation")),
            )
                .into_response()
        }
    }
}
