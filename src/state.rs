//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::config::{AppConfig, Credentials};
use crate::session;
use crate::store::PhotoStore;

/// State threaded through every handler: configuration, credentials, the
/// photo store, and the cookie signing key. No ambient globals.
#[derive(Clone)]
pub struct AppState {
    /// Validated runtime configuration.
    pub config: Arc<AppConfig>,
    /// Login credential table.
    pub credentials: Credentials,
    /// Manifest + serialized-writer handle.
    pub store: PhotoStore,
    key: Key,
}

impl AppState {
    /// Assembles state from validated configuration and an opened store.
    pub fn new(config: AppConfig, store: PhotoStore) -> Self {
        let credentials = config.credentials();
        let key = session::signing_key(&config.secret);
        Self {
            config: Arc::new(config),
            credentials,
            store,
            key,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}
