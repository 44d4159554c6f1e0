//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// The request conflicts with stored state (e.g. a phone number in use).
  #[error("conflict: {0}")]
  Conflict(String),

  /// Malformed body, query, path, or a field that fails validation.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error by the domain failure in its `source()` chain.
  ///
  /// Anything that is not a [`rolo_core::Error`] the caller can act on is an
  /// internal error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let classified = find_core(&e).and_then(|core| match core {
      rolo_core::Error::PhoneNumberTaken(_) => {
        Some(ApiError::Conflict(core.to_string()))
      }
      rolo_core::Error::ContactNotFound(_) => {
        Some(ApiError::NotFound(core.to_string()))
      }
      _ => None,
    });
    classified.unwrap_or_else(|| ApiError::Store(Box::new(e)))
  }
}

fn find_core<'a>(
  e: &'a (dyn std::error::Error + 'static),
) -> Option<&'a rolo_core::Error> {
  let mut current = Some(e);
  while let Some(err) = current {
    if let Some(core) = err.downcast_ref::<rolo_core::Error>() {
      return Some(core);
    }
    current = err.source();
  }
  None
}

impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self { ApiError::Validation(r.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(r: QueryRejection) -> Self { ApiError::Validation(r.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(r: PathRejection) -> Self { ApiError::Validation(r.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Error)]
  #[error("backend: {0}")]
  struct Wrapped(#[source] rolo_core::Error);

  #[derive(Debug, Error)]
  #[error("disk on fire")]
  struct Opaque;

  #[test]
  fn classifies_core_errors_through_source_chain() {
    let taken = ApiError::store(Wrapped(rolo_core::Error::PhoneNumberTaken(
      "5550001".into(),
    )));
    assert!(matches!(taken, ApiError::Conflict(ref m) if m.contains("5550001")));

    let missing = ApiError::store(Wrapped(rolo_core::Error::ContactNotFound(4)));
    assert!(matches!(missing, ApiError::NotFound(_)));

    let direct = ApiError::store(rolo_core::Error::ContactNotFound(4));
    assert!(matches!(direct, ApiError::NotFound(_)));
  }

  #[test]
  fn unknown_errors_are_internal() {
    assert!(matches!(ApiError::store(Opaque), ApiError::Store(_)));

    let corrupt = ApiError::store(Wrapped(rolo_core::Error::InvalidEmail("x".into())));
    assert!(matches!(corrupt, ApiError::Store(_)));
  }

  #[test]
  fn status_codes() {
    let status = |e: ApiError| e.into_response().status();
    assert_eq!(status(ApiError::NotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(status(ApiError::Conflict("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(
      status(ApiError::Validation("x".into())),
      StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
      status(ApiError::Store(Box::new(Opaque))),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[tokio::test]
  async fn internal_errors_hide_details() {
    let resp = ApiError::Store(Box::new(Opaque)).into_response();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "internal error" }));
  }
}
