//! Sparse, per-field updates.
//!
//! A patch field is either [`Field::Unset`] (leave the stored value alone) or
//! [`Field::Set`] (overwrite it, even with an empty string or `false`).
//! Presence drives the decision, never truthiness.
//!
//! When deserialised as part of a struct, mark each field `#[serde(default)]`:
//! a missing key becomes `Unset`, any present value becomes `Set`, and an
//! explicit `null` is rejected unless `T` itself accepts it.

use serde::{Deserialize, Deserializer};

/// One optional field of a patch request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Field<T> {
  #[default]
  Unset,
  Set(T),
}

impl<T> Field<T> {
  pub fn is_set(&self) -> bool { matches!(self, Self::Set(_)) }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
    match self {
      Self::Unset => Field::Unset,
      Self::Set(v) => Field::Set(f(v)),
    }
  }

  /// Like [`Field::map`] for conversions that can fail.
  pub fn try_map<U, E>(
    self,
    f: impl FnOnce(T) -> Result<U, E>,
  ) -> Result<Field<U>, E> {
    match self {
      Self::Unset => Ok(Field::Unset),
      Self::Set(v) => f(v).map(Field::Set),
    }
  }
}

impl<T: Clone> Field<T> {
  /// The patched value if set, otherwise a copy of `current`.
  pub fn merge(&self, current: &T) -> T {
    match self {
      Self::Unset => current.clone(),
      Self::Set(v) => v.clone(),
    }
  }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    T::deserialize(deserializer).map(Field::Set)
  }
}

/// A sparse update over a record type.
pub trait Patch {
  type Target;

  /// `true` when no field is `Set`. Stores treat an empty patch as a plain
  /// read-back of the current record.
  fn is_empty(&self) -> bool;

  /// Merge the patch over `current`: `Set` fields win, everything else
  /// (including server-assigned timestamps) is carried over unchanged.
  fn apply(&self, current: &Self::Target) -> Self::Target;
}
