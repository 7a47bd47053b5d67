//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/login` | Body: `{"username","password"}`; returns `{token, user}` |
//! | `POST` | `/auth/register` | Creates a `generic` user; returns `{message, user, token}` |

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use organizer_auth::password;
use organizer_core::{
  store::OrganizerStore,
  user::{NewUser, Role, User},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError, extract::Json, validate};

// ─── Login ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginBody {
  pub username: String,
  pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
  pub token: String,
  pub user:  User,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
  let user = state
    .store
    .get_user_by_username(&body.username)
    .await
    .map_err(ApiError::store)?;

  let Some(user) = user else {
    password::decoy_verify(&body.password);
    tracing::info!(username = %body.username, "login rejected");
    return Err(ApiError::InvalidCredentials);
  };

  if !password::verify_password(&body.password, &user.password_hash) {
    tracing::info!(username = %body.username, "login rejected");
    return Err(ApiError::InvalidCredentials);
  }

  let token = state.auth.codec().issue(user.id, user.display_name(), user.role)?;
  tracing::info!(user_id = user.id, "login");
  Ok(Json(LoginResponse { token, user }))
}

// ─── Register ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterBody {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub username:   String,
  pub password:   String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
  pub message: &'static str,
  pub user:    User,
  pub token:   String,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OrganizerStore + Clone + 'static,
{
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
      role:          Role::Generic,
    })
    .await
    .map_err(ApiError::store)?;

  let token = state.auth.codec().issue(user.id, user.display_name(), user.role)?;
  tracing::info!(user_id = user.id, "registered user");

  Ok((
    StatusCode::CREATED,
    Json(RegisterResponse { message: "User created successfully", user, token }),
  ))
}
