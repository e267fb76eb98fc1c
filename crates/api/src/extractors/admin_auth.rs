//! Admin API key authentication extractor.
//!
//! Every race order route requires an admin key in the `X-API-Key` header.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::models::{AdminCredential, AuthorRef};
use domain::services::CredentialStore;
use shared::crypto::{extract_key_prefix, is_well_formed_key, sha256_hex};

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

const INVALID_KEY: &str = "Invalid or missing API key";

/// An authenticated admin.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub key_id: i64,
    pub key_prefix: String,
    credential: AdminCredential,
}

impl AdminAuth {
    /// Validates a raw API key against the credential store.
    ///
    /// Unknown, inactive and expired keys are rejected with 401; valid keys
    /// of non-admin accounts with 403.
    pub async fn validate(store: &dyn CredentialStore, api_key: &str) -> Result<Self, ApiError> {
        if !is_well_formed_key(api_key) {
            return Err(ApiError::Unauthorized(INVALID_KEY.to_string()));
        }

        let credential = store
            .find_by_key_hash(&sha256_hex(api_key))
            .await
            .map_err(|e| {
                tracing::error!("Credential lookup failed: {}", e);
                ApiError::ServiceUnavailable("Authentication service unavailable".to_string())
            })?
            .ok_or_else(|| {
                tracing::warn!(
                    key_prefix = extract_key_prefix(api_key).unwrap_or_default(),
                    "Unknown admin API key"
                );
                ApiError::Unauthorized(INVALID_KEY.to_string())
            })?;

        if !credential.is_active {
            return Err(ApiError::Unauthorized(INVALID_KEY.to_string()));
        }
        if !credential.is_valid() {
            return Err(ApiError::Unauthorized("API key has expired".to_string()));
        }
        if !credential.is_admin {
            tracing::warn!(key_prefix = %credential.key_prefix, "Non-admin key used on admin route");
            return Err(ApiError::Forbidden("Admin access required".to_string()));
        }

        Ok(Self {
            key_id: credential.key_id,
            key_prefix: credential.key_prefix.clone(),
            credential,
        })
    }

    /// The account recorded as author of templates saved by this admin.
    pub fn author(&self) -> AuthorRef {
        self.credential.author()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized(INVALID_KEY.to_string()))?;

        let auth = Self::validate(state.credentials.as_ref(), api_key).await?;

        // Fire and forget
        let credentials = state.credentials.clone();
        let key_id = auth.key_id;
        tokio::spawn(async move {
            if let Err(e) = credentials.touch(key_id).await {
                tracing::warn!("Failed to update API key last_used_at: {}", e);
            }
        });

        Ok(auth)
    }
}
