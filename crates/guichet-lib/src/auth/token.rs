// ============================
// guichet-lib/src/auth/token.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Secure token generation for session cookies.
This module provides cryptographically secure token generation
for the opaque tokens the session issuer hands to browsers. */
use rand::{rngs::OsRng, RngCore};

/// Token size in bytes (32 bytes = 256 bits of entropy)
const TOKEN_BYTES: usize = 32;

/** Generate a cryptographically secure random session token.
Uses OS-provided entropy; the result is suitable as an opaque
session identifier.
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_token() -> String {
    let mut buffer = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
