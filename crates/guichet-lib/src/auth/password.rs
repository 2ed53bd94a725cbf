// ============================
// guichet-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

use crate::error::AppError;

/// Hash a password using scrypt with a fresh random salt.
///
/// Repeated calls on the same plaintext produce different PHC strings;
/// all of them verify against the plaintext.
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Hashing(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Hash a password and zeroize the plaintext.
pub fn hash_password_secure(plain: &mut String) -> Result<String, AppError> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}

/// Verify a password against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an
/// error. The verifier compares digests in constant time.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::Hashing(e.to_string()))?;
    match Scrypt.verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(scrypt::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Hashing(e.to_string())),
    }
}
