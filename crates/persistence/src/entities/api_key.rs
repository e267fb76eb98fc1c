//! API key entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::AdminCredential;
use sqlx::FromRow;
use uuid::Uuid;

/// An `api_keys` row joined with its owning `admin_accounts` row.
#[derive(Debug, Clone, FromRow)]
pub struct AdminKeyEntity {
    pub id: i64,
    pub key_prefix: String,
    pub account_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<AdminKeyEntity> for AdminCredential {
    fn from(entity: AdminKeyEntity) -> Self {
        Self {
            key_id: entity.id,
            key_prefix: entity.key_prefix,
            account_id: entity.account_id,
            email: entity.email,
            is_admin: entity.is_admin,
            is_active: entity.is_active,
            expires_at: entity.expires_at,
        }
    }
}
