//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: [`RegisterBody`]; returns 201 + user |
//! | `POST` | `/auth/login` | Body: [`LoginBody`]; `login` is a username or an email |
//! | `GET`  | `/auth/me` | The authenticated user |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use habit_core::{
  store::HabitStore,
  user::{NewUser, User},
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentUser, hash_password, verify_password},
  error::ApiError,
};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    String,
  pub username: String,
  pub password: String,
}

impl RegisterBody {
  fn validate(&self) -> Result<(), ApiError> {
    let email_ok = self
      .email
      .split_once('@')
      .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !email_ok {
      return Err(ApiError::BadRequest(format!("invalid email address: {:?}", self.email)));
    }
    if self.username.trim().is_empty() {
      return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    if self.password.is_empty() {
      return Err(ApiError::BadRequest("password must not be empty".into()));
    }
    Ok(())
  }
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  body.validate()?;

  let user = state
    .store
    .create_user(NewUser {
      password_hash: hash_password(&body.password)?,
      email:         body.email,
      username:      body.username,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %user.user_id, username = %user.username, "registered user");
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  /// Username or email.
  pub login:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type:   &'static str,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let user = state
    .store
    .find_user_by_login(&body.login)
    .await
    .map_err(ApiError::store)?
    .filter(|u| verify_password(&body.password, &u.password_hash));

  let Some(user) = user else {
    tracing::warn!(login = %body.login, "failed login attempt");
    return Err(ApiError::Unauthorized("incorrect username, email or password".into()));
  };

  Ok(Json(TokenResponse {
    access_token: state.tokens.issue(user.user_id)?,
    token_type:   "bearer",
  }))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> { Json(user) }
