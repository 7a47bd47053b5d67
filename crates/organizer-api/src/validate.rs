//! Payload checks shared by registration and the user endpoints.

use organizer_core::patch::Field;

use crate::error::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn required(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::Invalid(format!("{field} must not be empty")));
  }
  Ok(())
}

pub fn email(value: &str) -> Result<(), ApiError> {
  required("email", value)?;
  if !value.contains('@') {
    return Err(ApiError::Invalid("email is not a valid address".to_string()));
  }
  Ok(())
}

pub fn password(value: &str) -> Result<(), ApiError> {
  if value.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::Invalid(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

/// Run `check` on a patch field only when it is set.
pub fn if_set<T>(
  field: &Field<T>,
  check: impl FnOnce(&T) -> Result<(), ApiError>,
) -> Result<(), ApiError> {
  match field {
    Field::Set(v) => check(v),
    Field::Unset => Ok(()),
  }
}

/// The profile fields every new account must carry.
pub fn profile(
  first_name: &str,
  last_name:  &str,
  email_addr: &str,
  username:   &str,
) -> Result<(), ApiError> {
  required("first_name", first_name)?;
  required("last_name", last_name)?;
  email(email_addr)?;
  required("username", username)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_checks() {
    assert!(profile("Ann", "Lee", "ann@example.com", "ann").is_ok());
    assert!(profile("", "Lee", "ann@example.com", "ann").is_err());
    assert!(profile("Ann", "Lee", "not-an-email", "ann").is_err());
    assert!(profile("Ann", "Lee", "ann@example.com", "  ").is_err());
  }

  #[test]
  fn password_length() {
    assert!(password("12345").is_err());
    assert!(password("123456").is_ok());
  }

  #[test]
  fn unset_fields_are_not_checked() {
    assert!(if_set(&Field::<String>::Unset, |v| email(v)).is_ok());
    assert!(if_set(&Field::Set("nope".to_string()), |v| email(v)).is_err());
  }
}
