//! The `OrganizerStore` trait.
//!
//! Implemented by storage backends (e.g. `organizer-store-sqlite`). The HTTP
//! layer depends on this abstraction and receives a constructed store handle
//! at startup; nothing looks a connection up globally.
//!
//! Every lookup distinguishes three outcomes: `Ok(Some(_))` for a row,
//! `Ok(None)` (or `false`) for "no such row", and `Err(_)` for a backend
//! failure.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  note::{NewNote, Note, NotePatch},
  user::{NewUser, User, UserPatch},
};

// ─── Error classification ────────────────────────────────────────────────────

/// What a caller needs to know about a failed store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// A uniqueness constraint rejected the write.
  Conflict,
  /// The write pointed at a record that does not exist, e.g. a note for a
  /// deleted owner.
  MissingReference,
  /// Anything else: the backend is unavailable or misbehaving.
  Backend,
}

/// Implemented by backend error types so higher layers can react to
/// uniqueness violations without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the organizer's relational store.
///
/// Updates take a sparse patch: only `Set` fields are written, an empty patch
/// is a plain read-back, and the returned record is always re-read from the
/// store after the write.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait OrganizerStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user and return it with its assigned id.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// `true` if any user already holds `username` or `email`.
  fn user_exists<'a>(
    &'a self,
    username: &'a str,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// `true` if a user other than `id` holds `username` or `email`.
  fn username_or_email_taken_by_other<'a>(
    &'a self,
    id: i64,
    username: &'a str,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// All users, ordered by id.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Apply `patch` to user `id`. Returns `None` if the user does not exist.
  fn update_user(
    &self,
    id: i64,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Returns `false` if no row was deleted.
  fn delete_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_users(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Notes (always scoped to their owner) ──────────────────────────────

  fn create_note(
    &self,
    owner: i64,
    input: NewNote,
  ) -> impl Future<Output = Result<Note, Self::Error>> + Send + '_;

  /// Returns `None` if the note does not exist or belongs to someone else.
  fn get_note(
    &self,
    owner: i64,
    id: i64,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  /// Notes of `owner` on `date`, ordered by id. Hidden notes are skipped
  /// unless `include_hidden` is set.
  fn list_notes(
    &self,
    owner: i64,
    date: NaiveDate,
    include_hidden: bool,
  ) -> impl Future<Output = Result<Vec<Note>, Self::Error>> + Send + '_;

  /// Apply `patch` to one of `owner`'s notes. Returns `None` if the note does
  /// not exist or belongs to someone else.
  fn update_note(
    &self,
    owner: i64,
    id: i64,
    patch: NotePatch,
  ) -> impl Future<Output = Result<Option<Note>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted (absent or not owned).
  fn delete_note(
    &self,
    owner: i64,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
