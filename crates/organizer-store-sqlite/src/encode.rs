//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, note dates as `YYYY-MM-DD`, and
//! roles as their lowercase names.

use chrono::{DateTime, NaiveDate, Utc};
use organizer_core::{
  note::{DATE_FORMAT, Note, parse_date},
  user::{Role, User},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> { Ok(parse_date(s)?) }

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> String { r.to_string() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(Role::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "id, first_name, last_name, email, username, password_hash, role, created_at, updated_at";

pub const NOTE_COLUMNS: &str =
  "id, user_id, note_date, content, hidden, starred, created_at, updated_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:            i64,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub username:      String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      first_name:    row.get(1)?,
      last_name:     row.get(2)?,
      email:         row.get(3)?,
      username:      row.get(4)?,
      password_hash: row.get(5)?,
      role:          row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            self.id,
      first_name:    self.first_name,
      last_name:     self.last_name,
      email:         self.email,
      username:      self.username,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `notes` row.
pub struct RawNote {
  pub id:         i64,
  pub user_id:    i64,
  pub note_date:  String,
  pub content:    String,
  pub hidden:     bool,
  pub starred:    bool,
  pub created_at: String,
  pub updated_at: String,
}

impl RawNote {
  /// Map a row selected with [`NOTE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      user_id:    row.get(1)?,
      note_date:  row.get(2)?,
      content:    row.get(3)?,
      hidden:     row.get(4)?,
      starred:    row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_note(self) -> Result<Note> {
    Ok(Note {
      id:         self.id,
      user_id:    self.user_id,
      note_date:  decode_date(&self.note_date)?,
      content:    self.content,
      hidden:     self.hidden,
      starred:    self.starred,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
