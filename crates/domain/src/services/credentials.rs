//! Admin credential lookup.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::models::AdminCredential;

/// Resolves hashed API keys to admin credentials.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<AdminCredential>, StoreError>;

    /// Records that the key was just used.
    async fn touch(&self, key_id: i64) -> Result<(), StoreError>;
}

/// In-memory credential store keyed by SHA-256 hex of the raw key.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: RwLock<HashMap<String, AdminCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raw_key` for the given credential.
    pub async fn insert_key(&self, raw_key: &str, credential: AdminCredential) {
        let hash = shared::crypto::sha256_hex(raw_key);
        self.credentials.write().await.insert(hash, credential);
    }
}

#[async_trait::async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<AdminCredential>, StoreError> {
        Ok(self.credentials.read().await.get(key_hash).cloned())
    }

    async fn touch(&self, _key_id: i64) -> Result<(), StoreError> {
        Ok(())
    }
}
