//! Handlers for `/notes` endpoints. Every note belongs to the caller; another
//! user's note is indistinguishable from a missing one.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/notes` | `?date=YYYY-MM-DD` (default today, UTC), `?include_hidden=true` |
//! | `POST`   | `/notes` | Body: `{"note_date","content","hidden"?,"starred"?}` |
//! | `GET`    | `/notes/{id}` | |
//! | `PUT`/`PATCH` | `/notes/{id}` | Only supplied fields change |
//! | `DELETE` | `/notes/{id}` | |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{NaiveDate, Utc};
use organizer_auth::Operation;
use organizer_core::{
  note::{NewNote, Note, NotePatch},
  store::{OrganizerStore, StoreError as _, StoreErrorKind},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  error::ApiError,
  extract::{Caller, Json, Path, Query},
};

fn not_found(id: i64) -> ApiError { ApiError::NotFound(format!("note {id} not found")) }

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub date:           Option<NaiveDate>,
  #[serde(default)]
  pub include_hidden: bool,
}

/// `GET /notes[?date=<date>][&include_hidden=true]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Note>>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let me = caller.authorize(Operation::ListNotes)?;
  let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
  let notes = state
    .store
    .list_notes(me.subject_id, date, params.include_hidden)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notes))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /notes`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Json(body): Json<NewNote>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let me = caller.authorize(Operation::CreateNote)?;
  let note = state
    .store
    .create_note(me.subject_id, body)
    .await
    .map_err(|e| match e.kind() {
      // The token outlived its user.
      StoreErrorKind::MissingReference => ApiError::Unauthenticated,
      _ => ApiError::store(e),
    })?;
  Ok((StatusCode::CREATED, Json(note)))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /notes/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Json<Note>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let me = caller.authorize(Operation::GetNote)?;
  let note = state
    .store
    .get_note(me.subject_id, id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(note))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /notes/{id}` and `PATCH /notes/{id}`
///
/// An empty body is a read-back. Concurrent updates are last-writer-wins.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  Json(patch): Json<NotePatch>,
) -> Result<Json<Note>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let me = caller.authorize(Operation::UpdateNote)?;
  let note = state
    .store
    .update_note(me.subject_id, id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(note))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /notes/{id}`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let me = caller.authorize(Operation::DeleteNote)?;
  if !state
    .store
    .delete_note(me.subject_id, id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(not_found(id));
  }
  Ok(Json(json!({ "message": "deleted" })))
}
