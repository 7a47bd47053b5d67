//! Credential records: the users that can authenticate against the service.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  patch::{Field, Patch},
};

// ─── Role ────────────────────────────────────────────────────────────────────

/// The closed set of roles a user can hold. There is no inheritance between
/// roles; see `organizer_auth::policy` for what each one may do.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Admin,
  #[default]
  Generic,
}

impl Role {
  /// Parse the lowercase role name stored in the database or carried in a
  /// token.
  pub fn parse(s: &str) -> Result<Self> {
    Role::from_str(s).map_err(|_| Error::UnknownRole(s.to_owned()))
  }
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A stored credential record.
///
/// `password_hash` is never serialised; the record can be returned to
/// clients as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
  /// Store-assigned; never changes after creation.
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub username:      String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

impl User {
  /// The name embedded in tokens issued for this user.
  pub fn display_name(&self) -> &str { &self.username }
}

// ─── NewUser ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::OrganizerStore::create_user`]. The password must
/// already be hashed; timestamps and the id are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub username:      String,
  pub password_hash: String,
  pub role:          Role,
}

// ─── UserPatch ───────────────────────────────────────────────────────────────

/// A sparse update to a [`User`]. Only `Set` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
  pub first_name:    Field<String>,
  pub last_name:     Field<String>,
  pub email:         Field<String>,
  pub username:      Field<String>,
  pub password_hash: Field<String>,
  pub role:          Field<Role>,
}

impl Patch for UserPatch {
  type Target = User;

  fn is_empty(&self) -> bool {
    !(self.first_name.is_set()
      || self.last_name.is_set()
      || self.email.is_set()
      || self.username.is_set()
      || self.password_hash.is_set()
      || self.role.is_set())
  }

  fn apply(&self, current: &User) -> User {
    User {
      id:            current.id,
      first_name:    self.first_name.merge(&current.first_name),
      last_name:     self.last_name.merge(&current.last_name),
      email:         self.email.merge(&current.email),
      username:      self.username.merge(&current.username),
      password_hash: self.password_hash.merge(&current.password_hash),
      role:          self.role.merge(&current.role),
      created_at:    current.created_at,
      updated_at:    current.updated_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ann() -> User {
    let now = Utc::now();
    User {
      id:            7,
      first_name:    "Ann".into(),
      last_name:     "Lee".into(),
      email:         "ann@x.com".into(),
      username:      "ann".into(),
      password_hash: "$argon2id$fake".into(),
      role:          Role::Generic,
      created_at:    now,
      updated_at:    now,
    }
  }

  #[test]
  fn role_parses_lowercase_names() {
    assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
    assert_eq!(Role::parse("generic").unwrap(), Role::Generic);
    assert!(matches!(Role::parse("root"), Err(Error::UnknownRole(_))));
    assert_eq!(Role::Admin.to_string(), "admin");
  }

  #[test]
  fn password_hash_is_never_serialised() {
    let json = serde_json::to_value(ann()).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["role"], "generic");
  }

  #[test]
  fn role_only_patch_keeps_everything_else() {
    let current = ann();
    let patch = UserPatch { role: Field::Set(Role::Admin), ..Default::default() };
    let merged = patch.apply(&current);
    assert_eq!(merged.role, Role::Admin);
    assert_eq!(merged.username, current.username);
    assert_eq!(merged.password_hash, current.password_hash);
  }

  #[test]
  fn empty_user_patch_is_a_noop() {
    let current = ann();
    let patch = UserPatch::default();
    assert!(patch.is_empty());
    assert_eq!(patch.apply(&current), current);
  }
}
