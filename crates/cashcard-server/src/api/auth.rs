//! Authentication middleware for the card routes.
//!
//! Resolves the `Authorization` header through the gate, checks the
//! configured role, and stores the [`Principal`] in request extensions.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::api::error::ApiError;
use crate::api::handlers::AppState;

/// Reject unauthenticated requests (401) and principals without the
/// required role (403).
pub async fn require_role(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::unauthorized(state.gate.challenge()))?,
        ),
        None => None,
    };

    let principal = state
        .gate
        .authenticate(authorization)
        .await
        .map_err(|e| ApiError::from_gate(e, state.gate.challenge()))?;

    if !principal.has_role(&state.config.required_role) {
        warn!(
            principal = %principal.name,
            required_role = %state.config.required_role,
            "Principal lacks required role"
        );
        return Err(ApiError::Forbidden(format!(
            "Role '{}' required",
            state.config.required_role
        )));
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
