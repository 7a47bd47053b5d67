//! Error type for `organizer-store-sqlite`.

use organizer_core::store::{StoreError, StoreErrorKind};
use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] organizer_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    let Error::Database(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      _,
    ))) = self
    else {
      return StoreErrorKind::Backend;
    };

    match failure.extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
        StoreErrorKind::Conflict
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorKind::MissingReference,
      _ => StoreErrorKind::Backend,
    }
  }
}
