//! API request handlers

pub mod cards;

pub use cards::{
    create_card, delete_card, get_card, list_cards, update_card, AppState, CardServiceConfig,
    CARDS_PATH, DEFAULT_REQUIRED_ROLE,
};
