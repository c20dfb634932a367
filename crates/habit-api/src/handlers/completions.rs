//! Handlers for `/completions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/completions` | Body: [`NewCompletionBody`]; date defaults to today |
//! | `DELETE` | `/completions/:id` | 404 unless the completion's habit is owned by the caller |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use habit_core::{
  completion::{NewCompletion, Rating},
  store::HabitStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{owned_habit, today};
use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /completions`.
#[derive(Debug, Deserialize)]
pub struct NewCompletionBody {
  pub habit_id:       Uuid,
  pub completed_date: Option<NaiveDate>,
  pub notes:          Option<String>,
  /// Must be in `1..=5` when present.
  pub rating:         Option<u8>,
}

/// `POST /completions`. Returns 201 + the stored completion, or 400 if the
/// habit already has a completion for that date.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewCompletionBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let habit = owned_habit(state.store.as_ref(), &user, body.habit_id).await?;
  let rating = body.rating.map(Rating::try_from).transpose()?;

  let completion = state
    .store
    .record_completion(NewCompletion {
      habit_id:       habit.habit_id,
      completed_date: body.completed_date.unwrap_or_else(today),
      notes:          body.notes,
      rating,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(
    habit_id = %habit.habit_id,
    date = %completion.completed_date,
    "recorded completion"
  );
  Ok((StatusCode::CREATED, Json(completion)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /completions/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let not_found = || ApiError::from(habit_core::Error::CompletionNotFound(id));

  let completion = state
    .store
    .get_completion(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  owned_habit(state.store.as_ref(), &user, completion.habit_id)
    .await
    .map_err(|_| not_found())?;

  if !state.store.delete_completion(id).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  Ok(Json(json!({ "message": "Completion record deleted successfully" })))
}
