//! # CashCard Core
//!
//! Domain types shared by the CashCard service crates.
//!
//! ## Key Concepts
//!
//! - **CashCard**: a monetary amount owned by exactly one principal
//! - **Owner**: the authenticated principal name stored on a card
//! - **PageRequest**: a bounded, sorted slice of one owner's cards
//!
//! ## Ownership Rule
//!
//! A card is only ever read, changed or removed through operations scoped
//! to its owner. A card owned by someone else is indistinguishable from a
//! card that does not exist.

pub mod card;
pub mod error;
pub mod page;

pub use card::{validate_amount, CashCard, CashCardRequest};
pub use error::{CoreError, Result};
pub use page::{Direction, PageDefaults, PageRequest, SortField, SortOrder};
