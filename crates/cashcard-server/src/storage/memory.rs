//! In-memory storage backend
//!
//! Default storage implementation using a sorted map.
//! Suitable for development, tests and single-instance deployments.
//! Data is lost on restart.

use async_trait::async_trait;
use cashcard_core::{CashCard, PageRequest};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use super::{CardStore, StorageError};

/// In-memory card store implementation
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug)]
struct Inner {
    cards: BTreeMap<i64, CashCard>,
    next_id: i64,
}

impl MemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                cards: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StorageError> {
        self.inner.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StorageError> {
        self.inner.write().map_err(|_| StorageError::Poisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    // =========================================================================
    // Lookups
    // =========================================================================

    async fn find_by_id(&self, id: i64) -> Result<Option<CashCard>, StorageError> {
        Ok(self.read()?.cards.get(&id).cloned())
    }

    async fn find_by_id_and_owner(
        &self,
        id: i64,
        owner: &str,
    ) -> Result<Option<CashCard>, StorageError> {
        Ok(self
            .read()?
            .cards
            .get(&id)
            .filter(|card| card.is_owned_by(owner))
            .cloned())
    }

    async fn exists_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StorageError> {
        Ok(self
            .read()?
            .cards
            .get(&id)
            .is_some_and(|card| card.is_owned_by(owner)))
    }

    async fn find_by_owner(
        &self,
        owner: &str,
        page: &PageRequest,
    ) -> Result<Vec<CashCard>, StorageError> {
        let owned: Vec<CashCard> = self
            .read()?
            .cards
            .values()
            .filter(|card| card.is_owned_by(owner))
            .cloned()
            .collect();

        Ok(page.apply(owned))
    }

    async fn count(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.cards.len())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    async fn create(&self, amount: f64, owner: &str) -> Result<CashCard, StorageError> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let card = CashCard::new(id, amount, owner);
        inner.cards.insert(id, card.clone());
        info!(id = id, owner = %owner, "Created cash card");
        Ok(card)
    }

    async fn insert(&self, card: CashCard) -> Result<(), StorageError> {
        let mut inner = self.write()?;
        if inner.cards.contains_key(&card.id) {
            return Err(StorageError::AlreadyExists(card.id));
        }

        inner.next_id = inner.next_id.max(card.id + 1);
        debug!(id = card.id, owner = %card.owner, "Inserted cash card");
        inner.cards.insert(card.id, card);
        Ok(())
    }

    async fn update(
        &self,
        id: i64,
        amount: f64,
        owner: &str,
    ) -> Result<Option<CashCard>, StorageError> {
        let mut inner = self.write()?;
        let Some(card) = inner.cards.get_mut(&id).filter(|card| card.is_owned_by(owner)) else {
            return Ok(None);
        };

        card.amount = amount;
        info!(id = id, owner = %owner, "Updated cash card");
        Ok(Some(card.clone()))
    }

    async fn delete_by_id_and_owner(&self, id: i64, owner: &str) -> Result<bool, StorageError> {
        let mut inner = self.write()?;
        let owned = inner.cards.get(&id).is_some_and(|card| card.is_owned_by(owner));
        if owned {
            inner.cards.remove(&id);
            info!(id = id, owner = %owner, "Deleted cash card");
        }
        Ok(owned)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let removed = self.write()?.cards.remove(&id).is_some();
        if removed {
            info!(id = id, "Deleted cash card");
        }
        Ok(removed)
    }
}
