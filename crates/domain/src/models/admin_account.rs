//! Admin credentials used to authenticate template management requests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::race_order::AuthorRef;

/// An admin API key joined with the account that owns it.
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub key_id: i64,
    pub key_prefix: String,
    pub account_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AdminCredential {
    /// Returns true if the key is active and not expired at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at >= at,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn author(&self) -> AuthorRef {
        AuthorRef {
            id: self.account_id,
            email: self.email.clone(),
        }
    }
}
