//! Error types for `organizer-auth`.

use thiserror::Error;

use crate::policy::Operation;

#[derive(Debug, Error)]
pub enum PasswordError {
  #[error("password hashing failed: {0}")]
  Hash(String),
}

/// Why a token was not accepted (or could not be issued).
///
/// Callers reduce every decode failure to "unauthenticated"; the variants
/// exist for logging.
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("signing secret is empty")]
  MissingSecret,

  #[error("malformed token")]
  Malformed,

  #[error("bad token signature")]
  BadSignature,

  #[error("token expired")]
  Expired,

  #[error("token encoding failed: {0}")]
  Encode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
  #[error("unauthenticated")]
  Unauthenticated,

  #[error("{0} requires the admin role")]
  Forbidden(Operation),
}
