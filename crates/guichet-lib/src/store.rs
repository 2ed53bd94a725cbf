// ============================
// guichet-lib/src/store.rs
// ============================
//! Credential store abstraction with a SQLite implementation.
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::AppError;

/// A registered user row.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// Trait for credential store backends
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user row and return its id.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64, AppError>;

    /// Point lookup by username. Usernames are case-sensitive.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Point lookup by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
}

/// SQLite implementation of the `CredentialStore` trait.
///
/// Every operation is a single-row read or write; the connection sits
/// behind a mutex and is never held across an await point.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<rusqlite::Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let conn = rusqlite::Connection::open(path)?;

        // WAL mode for concurrent reads + crash safety
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;

             CREATE TABLE IF NOT EXISTS users (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 username TEXT NOT NULL UNIQUE,
                 password_hash TEXT NOT NULL
             );",
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64, AppError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (username, password_hash) VALUES (?1, ?2)",
            rusqlite::params![username, password_hash],
        );

        match result {
            Ok(_) => Ok(conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(AppError::UsernameTaken(username.to_string()))
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let conn = self.conn.lock();
        let row = conn.query_row(
            "SELECT id, username, password_hash FROM users WHERE username = ?1",
            rusqlite::params![username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        );

        match row {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let conn = self.conn.lock();
        let row = conn.query_row(
            "SELECT id, username, password_hash FROM users WHERE id = ?1",
            rusqlite::params![id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                })
            },
        );

        match row {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteStore) {
        let tmp = TempDir::new().unwrap();
        let store = SqliteStore::open(tmp.path().join("users.db")).unwrap();
        (tmp, store)
    }

    #[tokio::test]
    async fn create_and_find_by_username() {
        let (_tmp, store) = test_store();

        let id = store.create_user("alice", "phc-hash-value").await.unwrap();
        let user = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "phc-hash-value");
    }

    #[tokio::test]
    async fn find_by_id_round_trips() {
        let (_tmp, store) = test_store();

        let id = store.create_user("bob", "h").await.unwrap();
        let user = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(user.username, "bob");

        assert!(store.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_username_is_none_not_an_error() {
        let (_tmp, store) = test_store();

        assert!(store.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (_tmp, store) = test_store();

        store.create_user("alice", "h1").await.unwrap();
        let err = store.create_user("alice", "h2").await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken(name) if name == "alice"));
    }

    #[tokio::test]
    async fn username_lookup_is_case_sensitive() {
        let (_tmp, store) = test_store();

        store.create_user("Alice", "h").await.unwrap();
        assert!(store.find_by_username("alice").await.unwrap().is_none());

        // Different case is a different user, not a duplicate.
        store.create_user("alice", "h2").await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insertion_order() {
        let (_tmp, store) = test_store();

        let a = store.create_user("a", "h").await.unwrap();
        let b = store.create_user("b", "h").await.unwrap();
        assert!(b > a);
    }
}
