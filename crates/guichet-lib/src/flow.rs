// ============================
// guichet-lib/src/flow.rs
// ============================
//! The credential lifecycle: register, login, and profile lookup,
//! independent of any HTTP concern.
use metrics::counter;

use crate::auth::password::{hash_password_secure, verify_password};
use crate::error::AppError;
use crate::metrics::{LOGIN_FAILURE, LOGIN_SUCCESS, USER_REGISTERED};
use crate::store::{CredentialStore, User};

/// Public view of a user: id and username, never the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: i64,
    pub username: String,
}

impl From<User> for Profile {
    fn from(user: User) -> Self {
        Profile {
            id: user.id,
            username: user.username,
        }
    }
}

/// Register a new user.
///
/// Hashing happens first; nothing is persisted when it fails. The
/// plaintext is wiped once hashed. Registration does not log the user in.
pub async fn register<S: CredentialStore>(
    store: &S,
    username: &str,
    mut password: String,
) -> Result<i64, AppError> {
    let password_hash = hash_password_secure(&mut password)?;
    let user_id = store.create_user(username, &password_hash).await?;

    counter!(USER_REGISTERED).increment(1);
    tracing::info!(user_id, username, "user registered");

    Ok(user_id)
}

/// Verify credentials and return the user id on success.
///
/// An unknown username and a bad password are distinct outcomes, matching
/// the messages the gateway shows. A stored hash that fails to parse is
/// reported the same way as a mismatch: the login form learns nothing
/// extra from it.
pub async fn login<S: CredentialStore>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<i64, AppError> {
    let Some(user) = store.find_by_username(username).await? else {
        counter!(LOGIN_FAILURE).increment(1);
        return Err(AppError::UnknownUsername);
    };

    match verify_password(password, &user.password_hash) {
        Ok(true) => {
            counter!(LOGIN_SUCCESS).increment(1);
            tracing::info!(user_id = user.id, "login succeeded");
            Ok(user.id)
        },
        Ok(false) => {
            counter!(LOGIN_FAILURE).increment(1);
            Err(AppError::WrongPassword)
        },
        Err(e) => {
            counter!(LOGIN_FAILURE).increment(1);
            tracing::error!(user_id = user.id, error = %e, "stored hash is unreadable");
            Err(AppError::WrongPassword)
        },
    }
}

/// Fetch the profile for an authenticated user id.
///
/// A session referencing a user row that no longer exists resolves to
/// `Unauthenticated`; the caller is expected to discard the session.
pub async fn view_profile<S: CredentialStore>(store: &S, user_id: i64) -> Result<Profile, AppError> {
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    Ok(user.into())
}
