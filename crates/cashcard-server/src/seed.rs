//! Demo directory and demo cards
//!
//! `sarah1` and `kumar2` may use the card API; `mo1` authenticates but
//! lacks the card role.

use cashcard_core::CashCard;
use cashcard_gate::{GateError, InMemoryUserBackend, UserRecord};
use tracing::info;

use crate::api::handlers::DEFAULT_REQUIRED_ROLE;
use crate::storage::{CardStore, StorageError};

const NON_OWNER_ROLE: &str = "NON-OWNER";

/// Demo users: `(username, password, role)`
pub const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("sarah1", "abc123", DEFAULT_REQUIRED_ROLE),
    ("kumar2", "xyz789", DEFAULT_REQUIRED_ROLE),
    ("mo1", "asdf123", NON_OWNER_ROLE),
];

/// Build the demo user directory
pub fn demo_users() -> Result<InMemoryUserBackend, GateError> {
    let users = InMemoryUserBackend::new();
    for (username, password, role) in DEMO_USERS {
        users.register_user(
            UserRecord::new(*username, password)?.with_roles(vec![role.to_string()]),
        )?;
    }
    Ok(users)
}

/// Demo cards
pub fn demo_cards() -> Vec<CashCard> {
    vec![
        CashCard::new(99, 123.45, "sarah1"),
        CashCard::new(100, 1.00, "sarah1"),
        CashCard::new(101, 150.00, "sarah1"),
        CashCard::new(102, 200.00, "kumar2"),
    ]
}

/// Insert `cards`, skipping ids that are already present
///
/// Returns how many were inserted.
pub async fn seed_cards(
    store: &dyn CardStore,
    cards: Vec<CashCard>,
) -> Result<usize, StorageError> {
    let mut inserted = 0;
    for card in cards {
        match store.insert(card).await {
            Ok(()) => inserted += 1,
            Err(StorageError::AlreadyExists(_)) => {}
            Err(e) => return Err(e),
        }
    }

    info!(inserted = inserted, "Seeded cash cards");
    Ok(inserted)
}
