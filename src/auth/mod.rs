use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Salted password material as stored on a user record
#[derive(Debug, Clone)]
pub struct PasswordDigest {
    pub salt: String,
    pub hash: String,
}

/// Generate a random salt and derive the argon2 hash of `password` with it.
pub fn hash(password: &str) -> Result<PasswordDigest, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string();

    Ok(PasswordDigest {
        salt: salt.as_str().to_string(),
        hash,
    })
}

/// Recompute the hash of `password` with `salt` and compare it to `stored_hash`.
///
/// A stored hash that does not parse, or that was derived from a different
/// salt than the one on record, never verifies.
pub fn verify(password: &str, salt: &str, stored_hash: &str) -> bool {
    let Ok(salt) = SaltString::from_b64(salt) else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    if parsed.salt.map(|s| s.as_str()) != Some(salt.as_str()) {
        return false;
    }

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let digest = hash("hunter2").unwrap();
        assert!(verify("hunter2", &digest.salt, &digest.hash));
        assert!(!verify("hunter3", &digest.salt, &digest.hash));
    }

    #[test]
    fn salts_are_random() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn mismatched_salt_fails() {
        let a = hash("pw").unwrap();
        let b = hash("pw").unwrap();
        assert!(!verify("pw", &b.salt, &a.hash));
    }

    #[test]
    fn garbage_hash_fails() {
        let digest = hash("pw").unwrap();
        assert!(!verify("pw", &digest.salt, "not-a-phc-string"));
        assert!(!verify("pw", "", &digest.hash));
    }
}
