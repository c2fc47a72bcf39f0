//! API module for the CashCard server

pub mod auth;
pub mod error;
pub mod handlers;

use axum::{extract::State, http::StatusCode, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Readiness check response
#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub card_count: usize,
}

/// Health check endpoint
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Readiness check endpoint
///
/// GET /ready
///
/// 503 while the store cannot answer a count.
pub async fn ready(State(state): State<Arc<AppState>>) -> (StatusCode, Json<ReadyResponse>) {
    match state.store.count().await {
        Ok(card_count) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                card_count,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Store not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    ready: false,
                    card_count: 0,
                }),
            )
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cards = Router::new()
        .route(
            "/cashcards",
            get(handlers::list_cards).post(handlers::create_card),
        )
        .route(
            "/cashcards/{id}",
            get(handlers::get_card)
                .put(handlers::update_card)
                .delete(handlers::delete_card),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_role,
        ));

    Router::new()
        // Health endpoints
        .route("/health", get(health))
        .route("/ready", get(ready))
        // Card endpoints
        .merge(cards)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
