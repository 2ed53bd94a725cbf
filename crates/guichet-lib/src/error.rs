// ============================
// guichet-lib/src/error.rs
// ============================
//! Central error type for the gateway.
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Storage error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Username not found")]
    UnknownUsername,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Human-readable text shown to the user as a flash message.
    ///
    /// The browser only ever sees these strings; internal detail stays in
    /// the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Hashing(_) => "Error during registration. Please try again.".to_string(),
            AppError::UsernameTaken(name) => {
                format!("Username '{name}' is already taken.")
            },
            AppError::UnknownUsername => "Username not found.".to_string(),
            AppError::WrongPassword => "Incorrect password.".to_string(),
            AppError::Unauthenticated => {
                "You must be logged in to view your profile.".to_string()
            },
            AppError::Store(_) | AppError::Config(_) | AppError::Io(_) => {
                "Something went wrong. Please try again.".to_string()
            },
        }
    }
}
