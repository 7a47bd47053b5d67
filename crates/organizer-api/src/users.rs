//! Handlers for `/users` endpoints.
//!
//! Reads need any identity; writes need the admin role.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/users` | |
//! | `POST`   | `/users` | Admin. Body may set `role` |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PUT`/`PATCH` | `/users/{id}` | Admin. Only supplied fields change |
//! | `DELETE` | `/users/{id}` | Admin. The last remaining user cannot be deleted |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use organizer_auth::{Operation, password};
use organizer_core::{
  patch::{Field, Patch as _},
  store::OrganizerStore,
  user::{NewUser, Role, User, UserPatch},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  error::ApiError,
  extract::{Caller, Json, Path},
  validate,
};

fn not_found(id: i64) -> ApiError { ApiError::NotFound(format!("user {id} not found")) }

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  caller.authorize(Operation::ListUsers)?;
  let users = state.store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Json<User>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  caller.authorize(Operation::GetUser)?;
  let user = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(user))
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBody {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub username:   String,
  pub password:   String,
  #[serde(default)]
  pub role:       Role,
}

/// `POST /users`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let admin = caller.authorize(Operation::CreateUser)?;

  validate::profile(&body.first_name, &body.last_name, &body.email, &body.username)?;
  validate::password(&body.password)?;

  if state
    .store
    .user_exists(&body.username, &body.email)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::Conflict("username or email already in use".to_string()));
  }

  let user = state
    .store
    .create_user(NewUser {
      first_name:    body.first_name,
      last_name:     body.last_name,
      email:         body.email,
      username:      body.username,
      password_hash: password::hash_password(&body.password)?,
      role:          body.role,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(by = admin.subject_id, user_id = user.id, role = %user.role, "created user");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// A sparse user update. Absent keys leave the stored value alone.
#[derive(Deserialize)]
pub struct UpdateBody {
  #[serde(default)]
  pub first_name: Field<String>,
  #[serde(default)]
  pub last_name:  Field<String>,
  #[serde(default)]
  pub email:      Field<String>,
  #[serde(default)]
  pub username:   Field<String>,
  #[serde(default)]
  pub password:   Field<String>,
  #[serde(default)]
  pub role:       Field<Role>,
}

/// `PUT /users/{id}` and `PATCH /users/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<User>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let admin = caller.authorize(Operation::UpdateUser)?;

  validate::if_set(&body.first_name, |v| validate::required("first_name", v))?;
  validate::if_set(&body.last_name, |v| validate::required("last_name", v))?;
  validate::if_set(&body.email, |v| validate::email(v))?;
  validate::if_set(&body.username, |v| validate::required("username", v))?;
  validate::if_set(&body.password, |v| validate::password(v))?;

  let current = state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  let mut patch = UserPatch {
    first_name:    body.first_name,
    last_name:     body.last_name,
    email:         body.email,
    username:      body.username,
    password_hash: Field::Unset,
    role:          body.role,
  };

  if patch.username.is_set() || patch.email.is_set() {
    let merged = patch.apply(&current);
    if state
      .store
      .username_or_email_taken_by_other(id, &merged.username, &merged.email)
      .await
      .map_err(ApiError::store)?
    {
      return Err(ApiError::Conflict("username or email already in use".to_string()));
    }
  }

  patch.password_hash = body.password.try_map(|p| password::hash_password(&p))?;

  let user = state
    .store
    .update_user(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;

  tracing::info!(by = admin.subject_id, user_id = id, "updated user");
  Ok(Json(user))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
///
/// The user count is read before the delete runs, so two concurrent deletes
/// of the last two users can both pass the check.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  caller: Caller,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let admin = caller.authorize(Operation::DeleteUser)?;

  let count = state.store.count_users().await.map_err(ApiError::store)?;
  if count <= 1 {
    return Err(ApiError::Forbidden("cannot delete the last remaining user".to_string()));
  }

  if !state.store.delete_user(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }

  tracing::info!(by = admin.subject_id, user_id = id, "deleted user");
  Ok(Json(json!({ "message": "deleted" })))
}
