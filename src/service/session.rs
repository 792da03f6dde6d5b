//! Session issuing and resolution.
//!
//! A session is an opaque UUID v4 token mapped to the JSON-serialized
//! [`CurrentUser`] in the session store. Entries carry no expiry.

use std::sync::Arc;

use uuid::Uuid;

use super::ServiceError;
use crate::domain::CurrentUser;
use crate::infrastructure::{SessionStore, StoreError};

/// Issues, resolves and revokes session tokens.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore + Send + Sync>,
}

impl SessionService {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Creates a session for `identity` and returns its token.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the identity cannot be serialized or
    /// the session store write fails.
    pub async fn issue(&self, identity: &CurrentUser) -> Result<String, ServiceError> {
        let token = Uuid::new_v4().to_string();
        let value = serde_json::to_string(identity)
            .map_err(|error| StoreError::Serialization(error.to_string()))?;

        self.store.set(&token, &value).await?;
        tracing::debug!(user_id = %identity.id, "Session issued");

        Ok(token)
    }

    /// Resolves a token to the identity it was issued for.
    ///
    /// An empty token, an unknown token and an entry that no longer decodes
    /// all resolve to `None`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the session store cannot be reached.
    pub async fn resolve(&self, token: &str) -> Result<Option<CurrentUser>, ServiceError> {
        if token.is_empty() {
            return Ok(None);
        }

        let Some(value) = self.store.get(token).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&value) {
            Ok(identity) => Ok(Some(identity)),
            Err(error) => {
                tracing::warn!(%error, "Discarding undecodable session entry");
                Ok(None)
            }
        }
    }

    /// Deletes the session for `token`. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the session store cannot be reached.
    pub async fn revoke(&self, token: &str) -> Result<bool, ServiceError> {
        if token.is_empty() {
            return Ok(false);
        }
        Ok(self.store.delete(token).await?)
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SessionService")
            .field("store", &"Arc<dyn SessionStore>")
            .finish()
    }
}
