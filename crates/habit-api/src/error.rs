//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized: {0}")]
  Unauthorized(String),

  #[error("token error: {0}")]
  Token(#[from] jsonwebtoken::errors::Error),

  #[error("password hashing failed: {0}")]
  PasswordHash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a store error. Domain rejections found anywhere in the source
  /// chain become client errors; everything else is a 500.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    if let Some(domain) = domain_error(&err) {
      return Self::from_domain(domain);
    }
    tracing::error!(error = %err, "store operation failed");
    Self::Store(Box::new(err))
  }

  fn from_domain(err: &habit_core::Error) -> Self {
    use habit_core::Error as E;
    match err {
      E::HabitNotFound(_) | E::CompletionNotFound(_) | E::UserNotFound(_) => {
        Self::NotFound(err.to_string())
      }
      _ => Self::BadRequest(err.to_string()),
    }
  }
}

impl From<habit_core::Error> for ApiError {
  fn from(err: habit_core::Error) -> Self { Self::from_domain(&err) }
}

fn domain_error<'a>(
  err: &'a (dyn std::error::Error + 'static),
) -> Option<&'a habit_core::Error> {
  let mut current = Some(err);
  while let Some(e) = current {
    if let Some(domain) = e.downcast_ref::<habit_core::Error>() {
      return Some(domain);
    }
    current = e.source();
  }
  None
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Token(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
      ApiError::PasswordHash(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
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

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::*;

  #[test]
  fn duplicate_completion_in_source_chain_is_a_bad_request() {
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let err = habit_store_sqlite::Error::Core(habit_core::Error::AlreadyCompleted {
      habit_id: Uuid::nil(),
      date,
    });
    assert!(matches!(ApiError::store(err), ApiError::BadRequest(_)));
  }

  #[test]
  fn missing_record_is_not_found() {
    let err = habit_store_sqlite::Error::Core(habit_core::Error::HabitNotFound(Uuid::nil()));
    assert!(matches!(ApiError::store(err), ApiError::NotFound(_)));
  }

  #[test]
  fn other_store_errors_are_internal() {
    let err = habit_store_sqlite::Error::DateParse("garbage".into());
    let res = ApiError::store(err).into_response();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn unauthorized_carries_challenge() {
    let res = ApiError::Unauthorized("missing token".into()).into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
  }
}
