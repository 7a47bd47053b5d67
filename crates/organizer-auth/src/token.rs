//! Signed identity tokens (JWT, HS256).
//!
//! A token asserts who the caller is and which role they hold, for 24 hours
//! after issue. There is no server-side session or revocation list: a token
//! stays valid until it expires or the signing secret changes.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
  errors::ErrorKind,
};
use organizer_core::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TokenError;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// The payload carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The user id, as a decimal string.
  pub sub:  String,
  /// Display name of the subject at issue time.
  pub name: String,
  pub role: Role,
  /// Issued-at, seconds since the Unix epoch.
  pub iat:  i64,
  /// Expiry, seconds since the Unix epoch. Valid strictly before this.
  pub exp:  i64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub jti:  Option<Uuid>,
}

impl Claims {
  /// The numeric subject id, or `None` if `sub` is not a positive integer.
  pub fn subject_id(&self) -> Option<i64> {
    self.sub.parse::<i64>().ok().filter(|id| *id > 0)
  }
}

/// Issues and verifies tokens under one process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
}

impl fmt::Debug for TokenCodec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenCodec").finish_non_exhaustive()
  }
}

impl TokenCodec {
  /// Build a codec for `secret`. An empty secret is a configuration error.
  pub fn new(secret: &str) -> Result<Self, TokenError> {
    if secret.is_empty() {
      return Err(TokenError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is compared against an explicit clock in `verify_at`.
    validation.validate_exp = false;
    validation.leeway = 0;

    Ok(Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      validation,
    })
  }

  /// Issue a token for `subject_id`, valid for [`TOKEN_LIFETIME_HOURS`].
  pub fn issue(&self, subject_id: i64, name: &str, role: Role) -> Result<String, TokenError> {
    self.issue_at(subject_id, name, role, Utc::now())
  }

  pub fn issue_at(
    &self,
    subject_id: i64,
    name: &str,
    role: Role,
    now: DateTime<Utc>,
  ) -> Result<String, TokenError> {
    let claims = Claims {
      sub: subject_id.to_string(),
      name: name.to_owned(),
      role,
      iat: now.timestamp(),
      exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
      jti: Some(Uuid::new_v4()),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(TokenError::Encode)
  }

  /// Check signature and expiry, then return the claims.
  pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
    self.verify_at(token, Utc::now())
  }

  pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
    let claims = decode::<Claims>(token, &self.decoding, &self.validation)
      .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
          TokenError::BadSignature
        }
        _ => TokenError::Malformed,
      })?
      .claims;

    if now.timestamp() >= claims.exp {
      return Err(TokenError::Expired);
    }
    Ok(claims)
  }
}

/// Decode the claims of `token` WITHOUT checking its signature or expiry.
///
/// Anyone can mint a token this function accepts. Only use the result for
/// request-scoped convenience, never as proof of identity, unless the
/// transport already guarantees integrity.
pub fn decode_unverified(token: &str) -> Result<Claims, TokenError> {
  let mut validation = Validation::new(Algorithm::HS256);
  validation.insecure_disable_signature_validation();
  validation.validate_exp = false;
  validation.validate_aud = false;
  validation.required_spec_claims.clear();

  decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
    .map(|data| data.claims)
    .map_err(|_| TokenError::Malformed)
}
