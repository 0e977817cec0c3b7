use axum::{routing::get, Router};

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;

use db::DonationStore;

#[derive(Clone)]
pub struct AppState {
    pub store: DonationStore,
}

/// API routes without the network-facing layers (CORS, rate limiting),
/// which `main` adds.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/donations",
            get(routes::donations::list_donations).post(routes::donations::create_donation),
        )
        .route("/api/health", get(routes::health_check))
        .with_state(state)
}
