//! Notes: free text owned by one user and pinned to a calendar date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  patch::{Field, Patch},
};

/// The wire and storage format for note dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// A stored note. Only its owner can ever see or change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub id:         i64,
  /// The owning user's id.
  pub user_id:    i64,
  pub note_date:  NaiveDate,
  pub content:    String,
  /// Hidden notes are left out of listings unless explicitly requested.
  pub hidden:     bool,
  pub starred:    bool,
  pub created_at: DateTime<Utc>,
  /// Server-assigned on every successful write.
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::OrganizerStore::create_note`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
  pub note_date: NaiveDate,
  pub content:   String,
  #[serde(default)]
  pub hidden:    bool,
  #[serde(default)]
  pub starred:   bool,
}

/// A sparse update to a [`Note`]. The owner and id are never patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NotePatch {
  #[serde(default)]
  pub note_date: Field<NaiveDate>,
  #[serde(default)]
  pub content:   Field<String>,
  #[serde(default)]
  pub hidden:    Field<bool>,
  #[serde(default)]
  pub starred:   Field<bool>,
}

impl Patch for NotePatch {
  type Target = Note;

  fn is_empty(&self) -> bool {
    !(self.note_date.is_set()
      || self.content.is_set()
      || self.hidden.is_set()
      || self.starred.is_set())
  }

  fn apply(&self, current: &Note) -> Note {
    Note {
      id:         current.id,
      user_id:    current.user_id,
      note_date:  self.note_date.merge(&current.note_date),
      content:    self.content.merge(&current.content),
      hidden:     self.hidden.merge(&current.hidden),
      starred:    self.starred.merge(&current.starred),
      created_at: current.created_at,
      updated_at: current.updated_at,
    }
  }
}
