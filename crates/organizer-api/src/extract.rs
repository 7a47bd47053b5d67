//! Request extractors: the caller's identity, and JSON/path/query wrappers
//! that reject with [`ApiError`] instead of axum's plain-text bodies.

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::{header, request::Parts},
  response::{IntoResponse, Response},
};
use organizer_auth::{Identity, Operation, policy};
use organizer_core::store::OrganizerStore;
use serde::Serialize;

use crate::{AppState, error::ApiError};

// ─── Caller ──────────────────────────────────────────────────────────────────

/// Whoever the `Authorization` header says is calling.
///
/// Extraction fails with `401` when the header yields no identity, before
/// any request body is read. Handlers then call [`Caller::authorize`] with
/// the operation they are about to perform to check the role.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl Caller {
  pub fn authorize(&self, op: Operation) -> Result<&Identity, ApiError> {
    Ok(policy::authorize(Some(&self.0), op)?)
  }
}

impl<S> FromRequestParts<AppState<S>> for Caller
where
  S: OrganizerStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok());
    let identity = state.auth.identify(header).ok_or(ApiError::Unauthenticated)?;
    Ok(Caller(identity))
  }
}

// ─── Wrappers ────────────────────────────────────────────────────────────────

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response { axum::Json(self.0).into_response() }
}

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct Query<T>(pub T);
