//! Source of the classification API key.
//!
//! The key is held by a provider injected into [`crate::routes::AppState`].
//! Handlers read it once per request and pass the value down explicitly.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Provides the API key for the classification service.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The current key, or `None` when no usable key is configured.
    async fn current(&self) -> Option<String>;

    /// Replace the current key.
    async fn update(&self, api_key: String);
}

/// Provider keeping the key in memory for the lifetime of the service.
#[derive(Clone, Default)]
pub struct InMemoryCredentials {
    api_key: Arc<RwLock<Option<String>>>,
}

impl InMemoryCredentials {
    /// Create a provider seeded with an optional initial key.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            api_key: Arc::new(RwLock::new(initial.filter(|k| !k.trim().is_empty()))),
        }
    }
}

#[async_trait]
impl CredentialProvider for InMemoryCredentials {
    async fn current(&self) -> Option<String> {
        self.api_key.read().await.clone()
    }

    async fn update(&self, api_key: String) {
        let key = Some(api_key).filter(|k| !k.trim().is_empty());
        *self.api_key.write().await = key;
    }
}
