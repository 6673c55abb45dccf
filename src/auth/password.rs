//! Password hashing and verification.
//!
//! scrypt with a random per-password salt; the salt travels inside the
//! PHC hash string, so nothing besides the hash column is persisted.

use scrypt::{
    Scrypt,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a password using scrypt
pub fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored hash
///
/// A hash that fails to parse verifies as false rather than erroring;
/// the scrypt verifier itself does not short-circuit on mismatch.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("pw1").unwrap();
        assert!(verify_password(&hash, "pw1"));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("pw1").unwrap();
        assert!(!verify_password(&hash, "wrong"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn plaintext_never_appears_in_the_hash() {
        let hash = hash_password("hunter2-plaintext").unwrap();
        assert!(!hash.contains("hunter2-plaintext"));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("not-a-phc-string", "pw1"));
        assert!(!verify_password("", "pw1"));
    }
}
