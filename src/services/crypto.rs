use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::errors::ServiceError;

/// Hash a plaintext password with Argon2id
pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);

    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(|e| ServiceError::crypto("hash_password", e.to_string()))
}

/// Verify a plaintext password against a stored digest
///
/// An unparseable digest verifies as false, same as a mismatch.
pub fn verify_password(digest: &str, plain: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2_digest() {
        let digest = hash_password("secret1").expect("Failed to hash password");

        assert_ne!(digest, "secret1");
        assert!(digest.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_round_trip() {
        let digest = hash_password("secret1").unwrap();

        assert!(verify_password(&digest, "secret1"));
        assert!(!verify_password(&digest, "secret2"));
    }

    #[test]
    fn test_verify_password_rejects_malformed_digest() {
        assert!(!verify_password("not-a-digest", "secret1"));
    }

    #[test]
    fn test_same_password_hashes_differently_per_salt() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();

        assert_ne!(first, second);
    }
}
