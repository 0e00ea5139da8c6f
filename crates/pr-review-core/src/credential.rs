//! Credential persistence
//!
//! The GitHub token is the only value in the sync-scope store.

use log::{debug, info};
use pr_review_storage::{KeyValueStore, StorageError};
use serde_json::Value;
use std::sync::Arc;

/// Key of the credential in the sync store
pub const CREDENTIAL_KEY: &str = "githubToken";

#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stored credential; blank or non-string values count as absent
    pub async fn load(&self) -> Result<Option<String>, StorageError> {
        let value = self.store.get(CREDENTIAL_KEY).await?;
        let token = match value {
            Some(Value::String(token)) if !token.trim().is_empty() => Some(token),
            Some(_) => {
                debug!("Ignoring unusable stored credential");
                None
            }
            None => None,
        };
        Ok(token)
    }

    pub async fn save(&self, token: &str) -> Result<(), StorageError> {
        self.store
            .set(CREDENTIAL_KEY, Value::String(token.to_string()))
            .await?;
        info!("Saved GitHub token");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CREDENTIAL_KEY).await?;
        info!("Cleared GitHub token");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_review_storage::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_load_clear() {
        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(credentials.load().await.unwrap(), None);

        credentials.save("ghp_abc").await.unwrap();
        assert_eq!(credentials.load().await.unwrap().as_deref(), Some("ghp_abc"));

        credentials.clear().await.unwrap();
        assert_eq!(credentials.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_or_wrong_type_is_absent() {
        for value in [json!(""), json!("   "), json!(42), json!(null)] {
            let store = MemoryStore::with_entries([(CREDENTIAL_KEY, value)]);
            let credentials = CredentialStore::new(Arc::new(store));
            assert_eq!(credentials.load().await.unwrap(), None);
        }
    }
}
