//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use organizer_auth::{AccessError, PasswordError, TokenError};
use organizer_core::store::{StoreError, StoreErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthenticated,

  /// A failed login. Never says which half of the credentials was wrong.
  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("{0}")]
  Invalid(String),

  #[error("internal error: {0}")]
  Infrastructure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure: uniqueness violations become `409`, a dangling
  /// reference `404`, anything else is an infrastructure fault.
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      StoreErrorKind::Conflict => {
        ApiError::Conflict("conflicts with an existing record".to_string())
      }
      StoreErrorKind::MissingReference => {
        ApiError::NotFound("referenced record does not exist".to_string())
      }
      StoreErrorKind::Backend => ApiError::Infrastructure(Box::new(e)),
    }
  }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::Unauthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Invalid(_) => StatusCode::BAD_REQUEST,
      ApiError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<AccessError> for ApiError {
  fn from(e: AccessError) -> Self {
    match e {
      AccessError::Unauthenticated => ApiError::Unauthenticated,
      AccessError::Forbidden(_) => ApiError::Forbidden(e.to_string()),
    }
  }
}

impl From<PasswordError> for ApiError {
  fn from(e: PasswordError) -> Self { ApiError::Infrastructure(Box::new(e)) }
}

impl From<TokenError> for ApiError {
  fn from(e: TokenError) -> Self { ApiError::Infrastructure(Box::new(e)) }
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::Invalid(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::Invalid(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::Invalid(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = match &self {
      ApiError::Infrastructure(e) => {
        tracing::error!(error = %e, "request failed");
        "internal server error".to_string()
      }
      other => other.to_string(),
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
