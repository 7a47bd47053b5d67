//! [`SqliteStore`]: the SQLite implementation of [`OrganizerStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, types::Value};

use organizer_core::{
  note::{NewNote, Note, NotePatch},
  store::OrganizerStore,
  user::{NewUser, User, UserPatch},
};

use crate::{
  Result,
  encode::{
    NOTE_COLUMNS, RawNote, RawUser, USER_COLUMNS, encode_date, encode_dt, encode_role,
  },
  schema::SCHEMA,
  update::{Statement, UpdateBuilder},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An organizer store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a rendered `UPDATE ... RETURNING` and hand back the single row it
  /// touched, or `None` if the `WHERE` clause matched nothing.
  async fn run_update<R, F>(&self, stmt: Statement, map: F) -> Result<Option<R>>
  where
    R: Send + 'static,
    F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let Statement { sql, params } = stmt;
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), map)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  async fn count(&self, sql: &'static str, params: Vec<Value>) -> Result<i64> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, rusqlite::params_from_iter(params), |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }
}

// ─── OrganizerStore impl ─────────────────────────────────────────────────────

impl OrganizerStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let now      = encode_dt(Utc::now());
    let role_str = encode_role(input.role);

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO users (
               first_name, last_name, email, username, password_hash, role,
               created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             RETURNING {USER_COLUMNS}"
          ),
          rusqlite::params![
            input.first_name,
            input.last_name,
            input.email,
            input.username,
            input.password_hash,
            role_str,
            now,
          ],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
              rusqlite::params![id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
    let username = username.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
              rusqlite::params![username],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn user_exists(&self, username: &str, email: &str) -> Result<bool> {
    let n = self
      .count(
        "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
        vec![Value::Text(username.to_owned()), Value::Text(email.to_owned())],
      )
      .await?;
    Ok(n > 0)
  }

  async fn username_or_email_taken_by_other(
    &self,
    id:       i64,
    username: &str,
    email:    &str,
  ) -> Result<bool> {
    let n = self
      .count(
        "SELECT COUNT(*) FROM users WHERE (username = ?1 OR email = ?2) AND id != ?3",
        vec![
          Value::Text(username.to_owned()),
          Value::Text(email.to_owned()),
          Value::Integer(id),
        ],
      )
      .await?;
    Ok(n > 0)
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
    let mut builder = UpdateBuilder::new("users");
    builder
      .field("first_name", patch.first_name)
      .field("last_name", patch.last_name)
      .field("email", patch.email)
      .field("username", patch.username)
      .field("password_hash", patch.password_hash)
      .field("role", patch.role.map(encode_role));

    let keys = vec![("id", Value::Integer(id))];
    let Some(stmt) = builder.build(encode_dt(Utc::now()), keys, USER_COLUMNS) else {
      return self.get_user(id).await;
    };

    self
      .run_update(stmt, RawUser::from_row)
      .await?
      .map(RawUser::into_user)
      .transpose()
  }

  async fn delete_user(&self, id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?))
      .await?;
    Ok(affected > 0)
  }

  async fn count_users(&self) -> Result<u64> {
    let n = self.count("SELECT COUNT(*) FROM users", Vec::new()).await?;
    Ok(n.max(0) as u64)
  }

  // ── Notes ─────────────────────────────────────────────────────────────────

  async fn create_note(&self, owner: i64, input: NewNote) -> Result<Note> {
    let now      = encode_dt(Utc::now());
    let date_str = encode_date(input.note_date);

    let raw: RawNote = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO notes (
               user_id, note_date, content, hidden, starred, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {NOTE_COLUMNS}"
          ),
          rusqlite::params![owner, date_str, input.content, input.hidden, input.starred, now],
          RawNote::from_row,
        )?)
      })
      .await?;

    raw.into_note()
  }

  async fn get_note(&self, owner: i64, id: i64) -> Result<Option<Note>> {
    let raw: Option<RawNote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND user_id = ?2"),
              rusqlite::params![id, owner],
              RawNote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawNote::into_note).transpose()
  }

  async fn list_notes(
    &self,
    owner:          i64,
    date:           NaiveDate,
    include_hidden: bool,
  ) -> Result<Vec<Note>> {
    let date_str = encode_date(date);

    let raws: Vec<RawNote> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTE_COLUMNS} FROM notes
           WHERE user_id = ?1 AND note_date = ?2 AND (?3 OR hidden = 0)
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner, date_str, include_hidden], RawNote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNote::into_note).collect()
  }

  async fn update_note(&self, owner: i64, id: i64, patch: NotePatch) -> Result<Option<Note>> {
    let mut builder = UpdateBuilder::new("notes");
    builder
      .field("note_date", patch.note_date.map(encode_date))
      .field("content", patch.content)
      .field("hidden", patch.hidden)
      .field("starred", patch.starred);

    // Ownership is part of the key: someone else's note is "not found".
    let keys = vec![("id", Value::Integer(id)), ("user_id", Value::Integer(owner))];
    let Some(stmt) = builder.build(encode_dt(Utc::now()), keys, NOTE_COLUMNS) else {
      return self.get_note(owner, id).await;
    };

    self
      .run_update(stmt, RawNote::from_row)
      .await?
      .map(RawNote::into_note)
      .transpose()
  }

  async fn delete_note(&self, owner: i64, id: i64) -> Result<bool> {
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM notes WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id, owner],
        )?)
      })
      .await?;
    Ok(affected > 0)
  }
}
