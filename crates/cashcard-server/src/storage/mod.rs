//! Storage abstraction for cash cards
//!
//! This module provides a trait-based abstraction for the card table,
//! with an in-memory backend (default) and a PostgreSQL backend behind the
//! `postgres` feature.
//!
//! Every operation the API layer uses is scoped to an owner. The unscoped
//! lookups (`find_by_id`, `delete`) exist for seeding and maintenance only.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

use async_trait::async_trait;
use cashcard_core::{CashCard, PageRequest};
use std::fmt::Debug;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Card already exists: {0}")]
    AlreadyExists(i64),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Storage backend trait for cash cards
///
/// Implementations must be thread-safe and make each single-row operation
/// atomic.
#[async_trait]
pub trait CardStore: Send + Sync + Debug {
    // =========================================================================
    // Lookups
    // =========================================================================

    /// Get a card by id regardless of owner
    async fn find_by_id(&self, id: i64) -> Result<Option<CashCard>, StorageError>;

    /// Get a card by id, only if `owner` owns it
    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<CashCard>, StorageError>;

    /// Check whether `owner` owns a card with this id
    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StorageError>;

    /// One sorted page of `owner`'s cards
    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<CashCard>, StorageError>;

    /// Total number of cards across all owners
    async fn count(&self) -> Result<usize, StorageError>;

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new card and assign it a fresh id
    async fn create(&self, amount: f64, owner: &str) -> Result<CashCard, StorageError>;

    /// Insert a card with a caller-chosen id (seeding)
    ///
    /// Fails with `AlreadyExists` if the id is taken. Later `create` calls
    /// never reuse an inserted id.
    async fn insert(&self, card: CashCard) -> Result<(), StorageError>;

    /// Replace the amount of `owner`'s card, returning the updated card
    ///
    /// Returns `None` and changes nothing if no such card exists.
    async fn update(
        &self,
        id: i64,
        amount: f64,
        owner: &str,
    ) -> Result<Option<CashCard>, StorageError>;

    /// Remove `owner`'s card in one step
    async fn delete_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StorageError>;

    /// Remove a card regardless of owner
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;
}
