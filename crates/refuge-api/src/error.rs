//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error(transparent)]
  Store(#[from] refuge_core::Error),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    use refuge_core::Error as E;
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(e) => match e {
        E::NotFound { .. } => StatusCode::NOT_FOUND,
        E::DuplicateKey { .. }
        | E::CapacityExceeded { .. }
        | E::AlreadyAdmitted { .. }
        | E::AlreadyDischarged(_)
        | E::HasActiveOccupants { .. }
        | E::HasHistory { .. } => StatusCode::CONFLICT,
        E::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        E::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }

  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::Store(e) => e.kind(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string(), "kind": self.kind() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use refuge_core::{Entity, Error};

  use super::*;

  #[test]
  fn rule_violations_are_conflicts() {
    let e = ApiError::from(Error::CapacityExceeded { shelter_id: 1, capacity: 1 });
    assert_eq!(e.status(), StatusCode::CONFLICT);
    assert_eq!(e.kind(), "capacity_exceeded");

    let e = ApiError::from(Error::HasHistory { entity: Entity::Staff, id: 2 });
    assert_eq!(e.status(), StatusCode::CONFLICT);
  }

  #[test]
  fn validation_is_unprocessable() {
    let e = ApiError::from(Error::Validation("name must not be blank".into()));
    assert_eq!(e.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(e.kind(), "validation_error");
  }

  #[test]
  fn missing_rows_are_not_found() {
    let e = ApiError::from(Error::NotFound { entity: Entity::Stay, id: 9 });
    assert_eq!(e.status(), StatusCode::NOT_FOUND);
  }
}
