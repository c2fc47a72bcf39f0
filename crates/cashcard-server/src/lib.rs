//! CashCard Server
//!
//! An owner-scoped CRUD service for cash cards behind HTTP Basic
//! authentication.
//!
//! ## Ownership
//!
//! Every card belongs to the principal that created it. Reads, updates and
//! deletes are scoped to the caller, and a card owned by someone else
//! answers 404, exactly like a card that does not exist.
//!
//! ## API Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /ready` - Readiness check with card count
//! - `GET /cashcards/{id}` - Fetch one of the caller's cards
//! - `GET /cashcards?page=&size=&sort=` - Page through the caller's cards
//! - `POST /cashcards` - Create a card, 201 with `Location`
//! - `PUT /cashcards/{id}` - Replace a card's amount, 204
//! - `DELETE /cashcards/{id}` - Delete a card, 204

pub mod api;
pub mod config;
pub mod seed;
pub mod storage;

pub use api::create_router;
pub use api::handlers::{AppState, CardServiceConfig};
pub use config::{ConfigError, ServerConfig};
pub use storage::{CardStore, MemoryStore, StorageError};
