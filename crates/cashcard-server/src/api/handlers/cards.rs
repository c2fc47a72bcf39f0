//! Cash Card Handlers
//!
//! Every handler runs behind the auth middleware and receives the caller's
//! [`Principal`]. All store calls are scoped to `principal.name`, so a card
//! owned by someone else answers exactly like a card that does not exist.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use cashcard_core::{CashCard, CashCardRequest, PageDefaults, PageRequest};
use cashcard_gate::{AuthorizationGate, Principal};

use crate::api::error::ApiError;
use crate::storage::CardStore;

/// Default role a principal needs to use the card API
pub const DEFAULT_REQUIRED_ROLE: &str = "CARD-OWNER";

/// Base path of the card resource
pub const CARDS_PATH: &str = "/cashcards";

/// Card API configuration
#[derive(Debug, Clone)]
pub struct CardServiceConfig {
    /// Fallbacks for listing requests
    pub page_defaults: PageDefaults,
    /// Role checked after authentication
    pub required_role: String,
}

impl Default for CardServiceConfig {
    fn default() -> Self {
        Self {
            page_defaults: PageDefaults::default(),
            required_role: DEFAULT_REQUIRED_ROLE.to_string(),
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Card storage
    pub store: Arc<dyn CardStore>,
    /// Credential checks for every card request
    pub gate: Arc<AuthorizationGate>,
    /// Card API configuration
    pub config: CardServiceConfig,
}

/// Fetch one of the caller's cards
///
/// GET /cashcards/{id}
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<Json<CashCard>, ApiError> {
    let card = state
        .store
        .find_by_id_and_owner(id, &principal.name)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(card))
}

/// List a page of the caller's cards
///
/// GET /cashcards?page={n}&size={s}&sort={field},{asc|desc}
///
/// Unusable paging parameters fall back to the configured defaults.
pub async fn list_cards(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<CashCard>>, ApiError> {
    let page = PageRequest::from_query(params, &state.config.page_defaults);
    debug!(
        owner = %principal.name,
        page = page.page,
        size = page.size,
        sort = ?page.sort,
        "Listing cash cards"
    );

    let cards = state.store.find_by_owner(&principal.name, &page).await?;
    Ok(Json(cards))
}

/// Create a card owned by the caller
///
/// POST /cashcards
///
/// Any `id` or `owner` in the body is ignored. Responds 201 with a
/// `Location` header and no body.
pub async fn create_card(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CashCardRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1]), ApiError> {
    if request.id.is_some() || request.owner.is_some() {
        debug!(owner = %principal.name, "Ignoring client-supplied id/owner on create");
    }

    let amount = request.amount()?;
    let card = state.store.create(amount, &principal.name).await?;
    info!(id = card.id, owner = %card.owner, "Cash card created");

    let location = format!("{}/{}", CARDS_PATH, card.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// Replace the amount of one of the caller's cards
///
/// PUT /cashcards/{id}
pub async fn update_card(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<CashCardRequest>,
) -> Result<StatusCode, ApiError> {
    let amount = request.amount()?;

    state
        .store
        .update(id, amount, &principal.name)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the caller's cards
///
/// DELETE /cashcards/{id}
pub async fn delete_card(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_by_id_and_owner(id, &principal.name).await? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}
