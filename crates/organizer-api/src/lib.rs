//! JSON REST API for the organizer: accounts, login, and per-date notes.
//!
//! Exposes an axum [`Router`] backed by any [`OrganizerStore`]. Everything
//! is mounted under `/api/v1`:
//!
//! ```rust,ignore
//! axum::serve(listener, organizer_api::router(state)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod notes;
pub mod users;
pub mod validate;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  http::{HeaderValue, Method, header},
  routing::{get, post},
};
use organizer_auth::{Introspector, TrustMode, password};
use organizer_core::{
  store::OrganizerStore,
  user::{NewUser, Role, User},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ORGANIZER_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// HS256 signing secret for identity tokens. Must not be empty.
  pub jwt_secret:   String,
  #[serde(default)]
  pub token_trust:  TrustMode,
  /// Origins allowed to call the API from a browser.
  #[serde(default)]
  pub cors_origins: Vec<String>,
  /// Account created on first boot when the store holds no users.
  #[serde(default)]
  pub admin:        Option<AdminSeed>,
}

#[derive(Deserialize, Clone)]
pub struct AdminSeed {
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub username:   String,
  pub password:   String,
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub auth:   Arc<Introspector>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`, mounted under `/api/v1`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: OrganizerStore + Clone + 'static,
{
  let api = Router::new()
    .route("/healthz", get(healthz))
    // Auth
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/register", post(auth::register::<S>))
    // Users
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .put(users::update::<S>)
        .patch(users::update::<S>)
        .delete(users::delete::<S>),
    )
    // Notes
    .route("/notes", get(notes::list::<S>).post(notes::create::<S>))
    .route(
      "/notes/{id}",
      get(notes::get_one::<S>)
        .put(notes::update::<S>)
        .patch(notes::update::<S>)
        .delete(notes::delete::<S>),
    );

  let cors = cors_layer(&state.config.cors_origins);

  Router::new()
    .nest("/api/v1", api)
    .layer(cors)
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
  // A wildcard cannot be combined with credentials; tower-http panics on it.
  let origins: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| {
      if o.trim() == "*" {
        tracing::warn!("ignoring wildcard CORS origin; list origins explicitly");
        return None;
      }
      match HeaderValue::from_str(o) {
        Ok(v) => Some(v),
        Err(_) => {
          tracing::warn!(origin = %o, "ignoring invalid CORS origin");
          None
        }
      }
    })
    .collect();

  CorsLayer::new()
    .allow_origin(AllowOrigin::list(origins))
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::PATCH,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
    .allow_credentials(true)
}

/// `GET /healthz`
async fn healthz() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Bootstrap ───────────────────────────────────────────────────────────────

/// Create the configured admin account if the store is empty.
///
/// Returns the new user, or `None` if users already exist.
pub async fn seed_admin<S: OrganizerStore>(
  store: &S,
  seed:  &AdminSeed,
) -> Result<Option<User>, ApiError> {
  if store.count_users().await.map_err(ApiError::store)? > 0 {
    return Ok(None);
  }

  validate::profile(&seed.first_name, &seed.last_name, &seed.email, &seed.username)?;
  validate::password(&seed.password)?;

  let user = store
    .create_user(NewUser {
      first_name:    seed.first_name.clone(),
      last_name:     seed.last_name.clone(),
      email:         seed.email.clone(),
      username:      seed.username.clone(),
      password_hash: password::hash_password(&seed.password)?,
      role:          Role::Admin,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = user.id, username = %user.username, "seeded admin account");
  Ok(Some(user))
}

// ─── Integration tests ───────────────────────────────────────────────────────
