//! Pulling the caller's identity off an `Authorization` header.
//!
//! Two extraction modes exist:
//!
//! - [`TrustMode::Verified`] (the default) checks the token's signature and
//!   expiry before trusting any claim.
//! - [`TrustMode::Unverified`] only decodes the payload. It is cheaper, but a
//!   caller can claim any identity and role by minting their own token. It is
//!   kept for compatibility with deployments that terminate integrity
//!   elsewhere and must be opted into explicitly.
//!
//! Both modes fail closed: an absent header, a header that is not
//! `Bearer <token>`, an undecodable token, a non-positive subject id, or an
//! unknown role all yield no identity at all.

use organizer_core::user::Role;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{
  error::TokenError,
  token::{Claims, TokenCodec, decode_unverified},
};

/// Which extraction mode guarded requests use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
  #[default]
  Verified,
  Unverified,
}

/// Who is calling, as asserted by their token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub subject_id: i64,
  pub name:       String,
  pub role:       Role,
}

impl Identity {
  fn from_claims(claims: Claims) -> Option<Self> {
    Some(Self {
      subject_id: claims.subject_id()?,
      name:       claims.name,
      role:       claims.role,
    })
  }
}

/// Extract the token from a `Bearer <token>` header value. The scheme is
/// matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
  let (scheme, token) = header.trim().split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Short, non-reversible tag for a token, safe to put in logs.
pub fn fingerprint(token: &str) -> String {
  let digest = Sha256::digest(token.as_bytes());
  hex::encode(&digest[..6])
}

/// Resolves `Authorization` headers to identities.
#[derive(Debug, Clone)]
pub struct Introspector {
  codec: TokenCodec,
  mode:  TrustMode,
}

impl Introspector {
  pub fn new(codec: TokenCodec, mode: TrustMode) -> Self {
    if mode == TrustMode::Unverified {
      tracing::warn!(
        "token signatures are NOT verified on guarded requests; any client can \
         assert any identity"
      );
    }
    Self { codec, mode }
  }

  /// The codec used to issue tokens at login and registration.
  pub fn codec(&self) -> &TokenCodec { &self.codec }

  /// Resolve `header` using the configured [`TrustMode`].
  pub fn identify(&self, header: Option<&str>) -> Option<Identity> {
    match self.mode {
      TrustMode::Verified => self.identify_verified(header),
      TrustMode::Unverified => self.identify_unverified(header),
    }
  }

  /// Resolve `header`, trusting its claims only if the signature verifies and
  /// the token has not expired.
  pub fn identify_verified(&self, header: Option<&str>) -> Option<Identity> {
    let token = header.and_then(bearer_token)?;
    Self::accept(token, self.codec.verify(token))
  }

  /// Resolve `header` from its decoded payload alone.
  pub fn identify_unverified(&self, header: Option<&str>) -> Option<Identity> {
    let token = header.and_then(bearer_token)?;
    Self::accept(token, decode_unverified(token))
  }

  fn accept(token: &str, claims: Result<Claims, TokenError>) -> Option<Identity> {
    match claims {
      Ok(claims) => {
        let identity = Identity::from_claims(claims);
        if identity.is_none() {
          tracing::debug!(token = %fingerprint(token), "token has no usable subject");
        }
        identity
      }
      Err(e) => {
        tracing::debug!(token = %fingerprint(token), reason = %e, "rejected bearer token");
        None
      }
    }
  }
}
