//! Salted one-way password hashing (argon2id, default parameters).

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;

use crate::error::PasswordError;

/// Hash `password` with a fresh random salt. The same input yields a
/// different PHC string on every call.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `password` against a stored PHC string.
///
/// A wrong password and an unparseable hash both yield `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed))
    .is_ok()
}

static DECOY_HASH: LazyLock<String> =
  LazyLock::new(|| hash_password("organizer-decoy").unwrap_or_default());

/// Spend the same work as a real verification against a throwaway hash.
///
/// Called when a login names an unknown user, so the response time does not
/// tell the caller whether the username exists.
pub fn decoy_verify(password: &str) {
  let _ = verify_password(password, &DECOY_HASH);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verify_accepts_the_original_secret() {
    let hash = hash_password("secret1").unwrap();
    assert_ne!(hash, "secret1");
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("secret1", &hash));
  }

  #[test]
  fn verify_rejects_a_different_secret() {
    let hash = hash_password("secret1").unwrap();
    assert!(!verify_password("secret2", &hash));
    assert!(!verify_password("", &hash));
  }

  #[test]
  fn hashes_are_salted() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
    assert!(verify_password("same", &a));
    assert!(verify_password("same", &b));
  }

  #[test]
  fn corrupt_hash_is_just_false() {
    assert!(!verify_password("secret1", "not a phc string"));
    assert!(!verify_password("secret1", ""));
    assert!(!verify_password("secret1", "$argon2id$v=19$garbage"));
  }

  #[test]
  fn decoy_verification_does_not_panic() {
    decoy_verify("whatever");
  }
}
