//! Template storage abstraction.
//!
//! Handlers receive a `RaceOrderStore` through application state; the
//! Postgres repository implements it in production and
//! [`InMemoryRaceOrderStore`] in tests and database-less runs.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{NewRaceOrder, RaceOrder, TemplateKey};

/// Lookup-or-create storage for race order templates.
///
/// Saving is last-write-wins: a save whose key matches an existing template
/// replaces its pairings entirely and keeps its id.
#[async_trait::async_trait]
pub trait RaceOrderStore: Send + Sync {
    /// All templates, ordered by divisions, teams, boats, master teams and
    /// frequency.
    async fn list(&self) -> Result<Vec<RaceOrder>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RaceOrder>, StoreError>;

    /// The template stored under `key`, if any.
    async fn find_existing(&self, key: &TemplateKey) -> Result<Option<RaceOrder>, StoreError>;

    /// Inserts a new template or overwrites the one with the same key.
    async fn save(&self, template: NewRaceOrder) -> Result<RaceOrder, StoreError>;

    /// Deletes the given templates, returning how many were removed.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError>;

    /// Readiness check for the backing storage.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// In-memory template store.
#[derive(Debug, Default)]
pub struct InMemoryRaceOrderStore {
    templates: RwLock<HashMap<Uuid, RaceOrder>>,
}

impl InMemoryRaceOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RaceOrderStore for InMemoryRaceOrderStore {
    async fn list(&self) -> Result<Vec<RaceOrder>, StoreError> {
        let templates = self.templates.read().await;
        let mut list: Vec<RaceOrder> = templates.values().cloned().collect();
        list.sort_by(|a, b| a.key.sort_key().cmp(&b.key.sort_key()));
        Ok(list)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RaceOrder>, StoreError> {
        Ok(self.templates.read().await.get(&id).cloned())
    }

    async fn find_existing(&self, key: &TemplateKey) -> Result<Option<RaceOrder>, StoreError> {
        let templates = self.templates.read().await;
        Ok(templates.values().find(|t| &t.key == key).cloned())
    }

    async fn save(&self, template: NewRaceOrder) -> Result<RaceOrder, StoreError> {
        let mut templates = self.templates.write().await;
        let now = Utc::now();

        if let Some(existing) = templates.values_mut().find(|t| t.key == template.key) {
            existing.pairings = template.pairings;
            existing.description = template.description;
            existing.author = template.author;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let order = RaceOrder {
            id: Uuid::new_v4(),
            key: template.key,
            pairings: template.pairings,
            description: template.description,
            author: template.author,
            created_at: now,
            updated_at: now,
        };
        templates.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, StoreError> {
        let mut templates = self.templates.write().await;
        let removed = ids.iter().filter(|id| templates.remove(*id).is_some()).count();
        Ok(removed as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
