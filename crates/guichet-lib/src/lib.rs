// ============================
// guichet-lib/src/lib.rs
// ============================
//! Core library for the Guichet authentication gateway: credential
//! storage, password hashing, session issuance, and the web flow that
//! ties them together.

pub mod auth;
pub mod config;
pub mod error;
pub mod flow;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod store;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use crate::auth::session::SessionStore;
use crate::config::Settings;
use crate::store::CredentialStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Session issuer
    pub sessions: SessionStore,
    /// Settings
    pub settings: Arc<Settings>,
    /// Credential store backend
    pub store: S,
}

impl<S: CredentialStore> AppState<S> {
    /// Create a new application state.
    ///
    /// Spawns the session cleanup task, so this must run inside a tokio
    /// runtime.
    pub fn new(store: S, settings: Settings) -> Self {
        let sessions = SessionStore::new(
            settings.session_secret.clone(),
            Duration::from_secs(settings.session_ttl_secs),
        );
        Self {
            sessions,
            settings: Arc::new(settings),
            store,
        }
    }
}
