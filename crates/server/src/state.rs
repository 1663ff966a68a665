//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::kv::KvStore;
use crate::services::auth::AuthClient;
use crate::services::notifier::Notifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to configuration, the
/// key-value store, the auth platform client and the notification
/// dispatcher.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: KvStore,
    auth: AuthClient,
    notifier: Notifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the auth client from configuration and starts the
    /// notification dispatcher (a no-op when email is not configured).
    /// Must run inside the Tokio runtime.
    #[must_use]
    pub fn new(config: ServerConfig, store: KvStore) -> Self {
        let auth = AuthClient::new(&config.auth);
        let notifier = Notifier::spawn(config.email.as_ref());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                auth,
                notifier,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the key-value store.
    #[must_use]
    pub fn store(&self) -> &KvStore {
        &self.inner.store
    }

    /// Get a reference to the auth platform client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// Get a reference to the notification dispatcher handle.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}
