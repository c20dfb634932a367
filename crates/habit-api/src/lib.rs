//! JSON REST API for the habit tracker.
//!
//! Exposes an axum [`Router`] backed by any [`HabitStore`]. Callers
//! authenticate with a bearer token obtained from `POST /auth/login`.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = habit_api::router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use habit_core::store::HabitStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::TokenKeys;
use handlers::{auth as auth_routes, completions, habits, meta, stats};

// ─── Configuration ────────────────────────────────────────────────────────────

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_token_ttl() -> i64 { 30 }

/// Runtime server configuration, deserialised from `config.toml` and
/// `HABITS_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  pub store_path:        PathBuf,
  /// HS256 signing secret for access tokens.
  pub jwt_secret:        String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_minutes: i64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: HabitStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub tokens: Arc<TokenKeys>,
}

impl<S: HabitStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let tokens = TokenKeys::new(
      config.jwt_secret.as_bytes(),
      chrono::Duration::minutes(config.token_ttl_minutes),
    );
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      tokens: Arc::new(tokens),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: HabitStore + Clone + 'static,
{
  Router::new()
    .route("/",                         get(meta::root))
    .route("/health",                   get(meta::health))
    // Auth
    .route("/auth/register",            post(auth_routes::register::<S>))
    .route("/auth/login",               post(auth_routes::login::<S>))
    .route("/auth/me",                  get(auth_routes::me))
    // Habits
    .route("/habits",                   get(habits::list::<S>).post(habits::create::<S>))
    .route("/habits/today",             get(habits::today_list::<S>))
    .route(
      "/habits/{id}",
      get(habits::get_one::<S>)
        .put(habits::update::<S>)
        .delete(habits::delete::<S>),
    )
    .route("/habits/{id}/completions",  get(habits::completions::<S>))
    .route("/habits/{id}/detailed",     get(habits::detailed::<S>))
    .route("/habits/{id}/weekly",       get(habits::weekly::<S>))
    // Completions
    .route("/completions",              post(completions::create::<S>))
    .route("/completions/{id}",         delete(completions::delete::<S>))
    // Stats
    .route("/stats/overview",           get(stats::overview::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
