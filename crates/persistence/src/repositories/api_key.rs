//! Repository for API key database operations.

use domain::errors::StoreError;
use domain::models::AdminCredential;
use domain::services::CredentialStore;
use sqlx::PgPool;

use crate::entities::AdminKeyEntity;
use crate::metrics::QueryTimer;

/// Repository for API key operations.
#[derive(Clone)]
pub struct ApiKeyRepository {
    pool: PgPool,
}

impl ApiKeyRepository {
    /// Creates a new API key repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds an API key and its account by the key hash.
    pub async fn find_entity_by_key_hash(
        &self,
        key_hash: &str,
    ) -> Result<Option<AdminKeyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_api_key_by_hash");
        let result = sqlx::query_as::<_, AdminKeyEntity>(
            r#"
            SELECT k.id, k.key_prefix, k.account_id, a.email, a.is_admin,
                   k.is_active, k.expires_at
            FROM api_keys k
            JOIN admin_accounts a ON a.id = k.account_id
            WHERE k.key_hash = $1
            "#,
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Updates the last_used_at timestamp for an API key.
    pub async fn update_last_used(&self, key_id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = $1")
            .bind(key_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for ApiKeyRepository {
    async fn find_by_key_hash(&self, key_hash: &str) -> Result<Option<AdminCredential>, StoreError> {
        let entity = self.find_entity_by_key_hash(key_hash).await?;
        Ok(entity.map(AdminCredential::from))
    }

    async fn touch(&self, key_id: i64) -> Result<(), StoreError> {
        Ok(self.update_last_used(key_id).await?)
    }
}
