//! One-way credential hashing with Argon2id.
//!
//! Plaintext passwords exist only transiently on the way into `hash` or
//! `verify`; neither the stored hash format nor the plaintext ever crosses
//! this module's boundary in any other form.

use crate::ServiceError;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use tracing::{error, warn};

/// Hashes a plaintext password into a PHC-format string for storage.
pub fn hash(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            error!(cause = %err, "password hashing failed");
            ServiceError::Persistence
        })
}

/// Verifies a plaintext password against a stored PHC-format hash.
///
/// A malformed stored hash is treated as a verification failure; the
/// corruption is logged rather than surfaced to the login prompt.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(cause = %err, "stored credential hash is malformed");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash("correct horse battery staple").unwrap();
        assert!(verify("correct horse battery staple", &hashed));
        assert!(!verify("incorrect horse", &hashed));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash("same password").unwrap();
        let second = hash("same password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
