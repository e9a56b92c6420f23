//! Password hashing with argon2id.
//!
//! Hashes are stored as PHC strings, so parameters and salt travel with
//! the hash and can be upgraded without a schema change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use studyhall_types::error::AuthError;

/// Hash a plaintext password into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Verify a plaintext password against a stored PHC string.
///
/// An unparseable hash counts as a failed verification rather than an
/// error; login sees exactly one failure mode.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
