// ============================
// guichet-lib/src/auth/session.rs
// ============================
//! Session token handling and management.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use metrics::{counter, gauge};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::auth::token::generate_token;
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};

/// Interval between expired-session sweeps
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60); // 1 hour

/// Server-held session record.
///
/// `user_id` stays `None` until a successful login binds the session; an
/// anonymous session still carries flash messages across redirects.
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: Option<i64>,
    pub flash: Option<String>,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Session {
    fn expired(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Session issuer: maps opaque tokens to server-held session state.
///
/// The table is keyed by a salted digest of the token, so the in-memory
/// map never holds a value usable as a cookie.
#[derive(Clone)]
pub struct SessionStore {
    secret: Arc<str>,
    ttl: Duration,
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create a new session store and spawn the periodic cleanup task.
    pub fn new(secret: String, ttl: Duration) -> Self {
        let store = SessionStore {
            secret: secret.into(),
            ttl,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        };

        let sweeper = store.clone();
        tokio::spawn(async move {
            sweeper.cleanup_task().await;
        });

        store
    }

    /// Create a new anonymous session and return its opaque token.
    pub async fn create(&self) -> String {
        let token = generate_token();
        let now = SystemTime::now();
        let session = Session {
            user_id: None,
            flash: None,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(self.key_for(&token), session);

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        token
    }

    /// Look up a live session by token. Expired sessions resolve to `None`.
    pub async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&self.key_for(token))?;
        if session.expired(SystemTime::now()) {
            return None;
        }
        Some(session.clone())
    }

    /// Bind a session to an authenticated user id.
    ///
    /// Returns false when the token no longer resolves to a live session.
    pub async fn bind_user(&self, token: &str, user_id: i64) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&self.key_for(token)) {
            Some(session) if !session.expired(SystemTime::now()) => {
                session.user_id = Some(user_id);
                true
            },
            _ => false,
        }
    }

    /// Attach a one-time flash message to the session, replacing any
    /// pending one.
    pub async fn set_flash(&self, token: &str, message: impl Into<String>) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&self.key_for(token)) {
            session.flash = Some(message.into());
        }
    }

    /// Take the pending flash message, clearing it.
    pub async fn take_flash(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&self.key_for(token))?.flash.take()
    }

    /// Remove a session outright.
    pub async fn destroy(&self, token: &str) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(&self.key_for(token)).is_some() {
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before = sessions.len();

        sessions.retain(|_, session| !session.expired(now));

        let removed = before - sessions.len();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }

    /// Sessions are keyed by a secret-salted digest of the token, not the
    /// token itself.
    fn key_for(&self, token: &str) -> String {
        let mut digest = Sha256::new();
        digest.update(self.secret.as_bytes());
        digest.update(token.as_bytes());
        hex::encode(digest.finalize())
    }

    async fn cleanup_task(&self) {
        loop {
            tokio::time::sleep(CLEANUP_INTERVAL).await;
            self.purge_expired().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    fn test_store() -> SessionStore {
        SessionStore::new("test-secret".to_string(), TTL)
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = test_store();

        let token = store.create().await;
        let session = store.get(&token).await.unwrap();
        assert_eq!(session.user_id, None);
        assert_eq!(session.flash, None);
    }

    #[tokio::test]
    async fn unknown_token_is_none() {
        let store = test_store();

        assert!(store.get("no-such-token").await.is_none());
    }

    #[tokio::test]
    async fn bind_user_marks_the_session_authenticated() {
        let store = test_store();

        let token = store.create().await;
        assert!(store.bind_user(&token, 42).await);
        assert_eq!(store.get(&token).await.unwrap().user_id, Some(42));

        assert!(!store.bind_user("no-such-token", 42).await);
    }

    #[tokio::test]
    async fn flash_reads_exactly_once() {
        let store = test_store();

        let token = store.create().await;
        store.set_flash(&token, "Account created.").await;

        assert_eq!(
            store.take_flash(&token).await.as_deref(),
            Some("Account created.")
        );
        assert_eq!(store.take_flash(&token).await, None);
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_none() {
        let store = SessionStore::new("test-secret".to_string(), Duration::ZERO);

        let token = store.create().await;
        assert!(store.get(&token).await.is_none());
        assert!(!store.bind_user(&token, 1).await);

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.purge_expired().await, 0);
    }

    #[tokio::test]
    async fn destroy_removes_the_session() {
        let store = test_store();

        let token = store.create().await;
        store.destroy(&token).await;
        assert!(store.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let store = test_store();

        let alice = store.create().await;
        let bob = store.create().await;
        store.bind_user(&alice, 1).await;
        store.set_flash(&bob, "hello").await;

        assert_eq!(store.get(&alice).await.unwrap().user_id, Some(1));
        assert_eq!(store.get(&bob).await.unwrap().user_id, None);
        assert_eq!(store.take_flash(&alice).await, None);
        assert_eq!(store.take_flash(&bob).await.as_deref(), Some("hello"));
    }
}
