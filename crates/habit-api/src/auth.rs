//! Password hashing, bearer-token issuance, and the authenticated-user
//! extractor.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use chrono::{Duration, Utc};
use habit_core::{store::HabitStore, user::User};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Passwords ────────────────────────────────────────────────────────────────

/// Hash a password into an argon2id PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::PasswordHash(e.to_string()))
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ───────────────────────────────────────────────────────────────────

/// JWT payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub user_id: Uuid,
  /// Expiry, seconds since the Unix epoch.
  pub exp:     i64,
}

/// HS256 signing and verification keys plus the token lifetime.
pub struct TokenKeys {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenKeys {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation: Validation::new(Algorithm::HS256),
      ttl,
    }
  }

  /// Issue an access token for `user_id` that expires after the configured
  /// lifetime.
  pub fn issue(&self, user_id: Uuid) -> Result<String, ApiError> {
    let claims = Claims { user_id, exp: (Utc::now() + self.ttl).timestamp() };
    Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
  }

  /// Return the user a token was issued to, if the signature is valid and it
  /// has not expired.
  pub fn verify(&self, token: &str) -> Result<Uuid, ApiError> {
    decode::<Claims>(token, &self.decoding, &self.validation)
      .map(|data| data.claims.user_id)
      .map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        ApiError::Unauthorized("could not validate credentials".into())
      })
  }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.split_once(' ')?;
  scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The authenticated caller. Present in a handler means the request carried a
/// valid token for a user that still exists.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: HabitStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    let user_id = state.tokens.verify(token)?;

    let user = state
      .store
      .get_user(user_id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| ApiError::Unauthorized("could not validate credentials".into()))?;
    Ok(CurrentUser(user))
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn keys() -> TokenKeys { TokenKeys::new(b"test-secret", Duration::minutes(30)) }

  #[test]
  fn hash_and_verify() {
    let hash = hash_password("correct-horse-battery-staple").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("correct-horse-battery-staple", &hash));
    assert!(!verify_password("wrong", &hash));
  }

  #[test]
  fn same_password_gets_different_salts() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("password", "not-a-phc-string"));
  }

  #[test]
  fn token_roundtrip() {
    let keys = keys();
    let id = Uuid::new_v4();
    let token = keys.issue(id).unwrap();
    assert_eq!(keys.verify(&token).unwrap(), id);
  }

  #[test]
  fn expired_token_is_rejected() {
    let keys = TokenKeys::new(b"test-secret", Duration::minutes(-10));
    let token = keys.issue(Uuid::new_v4()).unwrap();
    assert!(matches!(keys.verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn token_from_other_secret_is_rejected() {
    let other = TokenKeys::new(b"other-secret", Duration::minutes(30));
    let token = other.issue(Uuid::new_v4()).unwrap();
    assert!(matches!(keys().verify(&token), Err(ApiError::Unauthorized(_))));
  }

  #[test]
  fn bearer_header_parsing() {
    let mut headers = HeaderMap::new();
    assert_eq!(bearer_token(&headers), None);

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
    assert_eq!(bearer_token(&headers), Some("abc.def"));

    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
    assert_eq!(bearer_token(&headers), None);
  }
}
