//! Session
//!
//! What the device remembers between launches: the customer's
//! pseudo-identity and, for growers, who is signed in.

use std::sync::Arc;

use pestitele::{favorites::CustomerId, growers::GrowerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::device::{KeyValueError, KeyValueStore};

const CUSTOMER_ID_KEY: &str = "zakaznik_id";
const GROWER_SESSION_KEY: &str = "pestitel_session";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("device storage error")]
    Storage(#[from] KeyValueError),

    #[error("failed to encode session")]
    Encode(#[from] serde_json::Error),
}

/// Role of a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A grower managing their own listings
    Pestitel,
}

/// A signed-in grower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowerSession {
    pub grower_id: GrowerId,
    pub name: String,
    pub role: Role,
}

impl GrowerSession {
    #[must_use]
    pub fn grower(grower_id: GrowerId, name: impl Into<String>) -> Self {
        Self {
            grower_id,
            name: name.into(),
            role: Role::Pestitel,
        }
    }
}

/// Session state over the device's key-value storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// The customer's identity, created and persisted on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if device storage fails.
    pub async fn customer_id(&self) -> Result<CustomerId, SessionError> {
        let stored = self.storage.get(CUSTOMER_ID_KEY).await?;

        if let Some(id) = stored.as_deref().and_then(CustomerId::from_stored) {
            return Ok(id);
        }

        let id = CustomerId::generate();
        self.storage.set(CUSTOMER_ID_KEY, id.as_str()).await?;

        info!(customer_id = %id, "created customer identity");

        Ok(id)
    }

    /// The signed-in grower, if any. An unreadable session counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns an error if device storage fails.
    pub async fn grower(&self) -> Result<Option<GrowerSession>, SessionError> {
        let Some(raw) = self.storage.get(GROWER_SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                warn!(%error, "discarding unreadable grower session");
                Ok(None)
            }
        }
    }

    /// Remembers a grower after login or registration.
    ///
    /// # Errors
    ///
    /// Returns an error if device storage fails.
    pub async fn sign_in(&self, session: &GrowerSession) -> Result<(), SessionError> {
        self.storage
            .set(GROWER_SESSION_KEY, &serde_json::to_string(session)?)
            .await?;

        info!(grower_id = %session.grower_id, "grower signed in");

        Ok(())
    }

    /// Forgets the grower. The customer identity is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if device storage fails.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        self.storage.remove(GROWER_SESSION_KEY).await?;

        info!("grower signed out");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::device::MemoryKeyValueStore;

    use super::*;

    fn session() -> (Arc<MemoryKeyValueStore>, SessionStore) {
        let storage = Arc::new(MemoryKeyValueStore::new());

        (storage.clone(), SessionStore::new(storage))
    }

    #[tokio::test]
    async fn customer_id_is_created_once() -> TestResult {
        let (_, session) = session();

        let first = session.customer_id().await?;
        let second = session.customer_id().await?;

        assert_eq!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn sign_out_keeps_customer_identity() -> TestResult {
        let (_, session) = session();
        let customer = session.customer_id().await?;
        let grower = GrowerSession::grower(GrowerId::new(), "Jana");

        session.sign_in(&grower).await?;
        assert_eq!(session.grower().await?, Some(grower));

        session.sign_out().await?;
        assert_eq!(session.grower().await?, None);
        assert_eq!(session.customer_id().await?, customer);

        Ok(())
    }

    #[tokio::test]
    async fn unreadable_session_is_signed_out() -> TestResult {
        let (storage, session) = session();
        storage.set(GROWER_SESSION_KEY, "{").await?;

        assert_eq!(session.grower().await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let mut storage = crate::device::MockKeyValueStore::new();
        storage.expect_get().returning(|_| {
            Err(KeyValueError::Io(std::io::Error::other("disk gone")))
        });

        let session = SessionStore::new(Arc::new(storage));

        assert!(matches!(
            session.customer_id().await,
            Err(SessionError::Storage(_))
        ));
    }
}
