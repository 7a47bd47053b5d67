//! The access policy gate: a static table from operation to required role.

use organizer_core::user::Role;

use crate::{error::AccessError, introspect::Identity};

/// Every guarded operation of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
  ListUsers,
  GetUser,
  CreateUser,
  UpdateUser,
  DeleteUser,
  ListNotes,
  GetNote,
  CreateNote,
  UpdateNote,
  DeleteNote,
}

impl Operation {
  /// Mutations of credential records are reserved for admins.
  pub const fn admin_only(self) -> bool {
    matches!(self, Self::CreateUser | Self::UpdateUser | Self::DeleteUser)
  }
}

/// Whether `role` may perform `op`.
pub fn allow(role: Role, op: Operation) -> bool {
  !op.admin_only() || role == Role::Admin
}

/// Gate `op` for the caller. No identity is `Unauthenticated`; an identity
/// without the required role is `Forbidden`.
pub fn authorize(identity: Option<&Identity>, op: Operation) -> Result<&Identity, AccessError> {
  let identity = identity.ok_or(AccessError::Unauthenticated)?;
  if allow(identity.role, op) {
    Ok(identity)
  } else {
    tracing::debug!(subject = identity.subject_id, %op, "access denied");
    Err(AccessError::Forbidden(op))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const ALL: [Operation; 10] = [
    Operation::ListUsers,
    Operation::GetUser,
    Operation::CreateUser,
    Operation::UpdateUser,
    Operation::DeleteUser,
    Operation::ListNotes,
    Operation::GetNote,
    Operation::CreateNote,
    Operation::UpdateNote,
    Operation::DeleteNote,
  ];

  fn identity(role: Role) -> Identity {
    Identity { subject_id: 1, name: "ann".into(), role }
  }

  #[test]
  fn admin_may_do_everything() {
    assert!(ALL.iter().all(|op| allow(Role::Admin, *op)));
  }

  #[test]
  fn generic_may_not_touch_users() {
    for op in ALL {
      assert_eq!(allow(Role::Generic, op), !op.admin_only(), "{op}");
    }
    assert!(!allow(Role::Generic, Operation::DeleteUser));
    assert!(allow(Role::Generic, Operation::UpdateNote));
  }

  #[test]
  fn missing_identity_is_unauthenticated_not_forbidden() {
    assert_eq!(
      authorize(None, Operation::ListNotes).unwrap_err(),
      AccessError::Unauthenticated
    );
    assert_eq!(
      authorize(None, Operation::CreateUser).unwrap_err(),
      AccessError::Unauthenticated
    );
  }

  #[test]
  fn wrong_role_is_forbidden() {
    let generic = identity(Role::Generic);
    assert_eq!(
      authorize(Some(&generic), Operation::CreateUser).unwrap_err(),
      AccessError::Forbidden(Operation::CreateUser)
    );
    assert!(authorize(Some(&generic), Operation::GetUser).is_ok());
    assert!(authorize(Some(&identity(Role::Admin)), Operation::CreateUser).is_ok());
  }

  #[test]
  fn operations_display_in_snake_case() {
    assert_eq!(Operation::DeleteUser.to_string(), "delete_user");
  }
}
