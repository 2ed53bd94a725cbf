// ============================
// guichet-lib/src/router.rs
// ============================
//! Route table for the gateway.
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::CredentialStore;
use crate::AppState;

/// Create the HTTP router
pub fn create_router<S: CredentialStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/", get(handlers::login_page))
        .route(
            "/inscription",
            get(handlers::register_page).post(handlers::register_submit),
        )
        .route("/connexion", post(handlers::login_submit))
        .route("/profil", get(handlers::profile_page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
