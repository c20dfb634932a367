//! Handlers for `/habits` endpoints. Every route is scoped to the
//! authenticated user's own habits.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/habits` | Optional `?frequency=`, `?skip=`, `?limit=` (default 100) |
//! | `POST`   | `/habits` | Body: [`NewHabit`]; returns 201 + habit |
//! | `GET`    | `/habits/today` | One [`TodayView`] per habit |
//! | `GET`    | `/habits/:id` | 404 if missing or not owned |
//! | `PUT`    | `/habits/:id` | Body: [`HabitUpdate`]; absent fields are kept |
//! | `DELETE` | `/habits/:id` | Also deletes the habit's completions |
//! | `GET`    | `/habits/:id/completions` | Newest first |
//! | `GET`    | `/habits/:id/detailed` | [`DetailedView`] |
//! | `GET`    | `/habits/:id/weekly` | Completions per weekday over 4 weeks |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use habit_core::{
  completion::Completion,
  habit::{Frequency, Habit, HabitUpdate, NewHabit},
  stats::{self, DetailedView, TodayView},
  store::{HabitQuery, HabitStore},
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::{owned_habit, today};
use crate::{AppState, auth::CurrentUser, error::ApiError};

/// Page size for `GET /habits` when `limit` is not given.
const DEFAULT_PAGE_SIZE: usize = 100;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub frequency: Option<Frequency>,
  pub skip:      Option<usize>,
  pub limit:     Option<usize>,
}

/// `GET /habits[?frequency=daily][&skip=0][&limit=100]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Habit>>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let query = HabitQuery {
    frequency: params.frequency,
    limit:     Some(params.limit.unwrap_or(DEFAULT_PAGE_SIZE)),
    offset:    params.skip,
  };
  let habits = state
    .store
    .list_habits(user.user_id, &query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(habits))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /habits`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Json(body): Json<NewHabit>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("habit name must not be empty".into()));
  }
  let habit = state
    .store
    .create_habit(user.user_id, body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(habit)))
}

// ─── Today ────────────────────────────────────────────────────────────────────

/// `GET /habits/today`
pub async fn today_list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TodayView>>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let today = today();
  let habits = state
    .store
    .list_habits(user.user_id, &HabitQuery::default())
    .await
    .map_err(ApiError::store)?;

  let mut views = Vec::with_capacity(habits.len());
  for habit in habits {
    let completions = state
      .store
      .completions_for_habit(habit.habit_id)
      .await
      .map_err(ApiError::store)?;
    views.push(stats::today_view(habit, &completions, today));
  }
  Ok(Json(views))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /habits/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Habit>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  Ok(Json(owned_habit(state.store.as_ref(), &user, id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /habits/:id`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<HabitUpdate>,
) -> Result<Json<Habit>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  owned_habit(state.store.as_ref(), &user, id).await?;
  let habit = state
    .store
    .update_habit(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::from(habit_core::Error::HabitNotFound(id)))?;
  Ok(Json(habit))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /habits/:id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let habit = owned_habit(state.store.as_ref(), &user, id).await?;
  if !state.store.delete_habit(id).await.map_err(ApiError::store)? {
    return Err(habit_core::Error::HabitNotFound(id).into());
  }
  tracing::info!(habit_id = %id, "deleted habit");
  Ok(Json(json!({
    "message":          format!("Habit '{}' deleted successfully", habit.name),
    "deleted_habit_id": id,
  })))
}

// ─── Completions and stats ────────────────────────────────────────────────────

/// `GET /habits/:id/completions`
pub async fn completions<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Completion>>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  owned_habit(state.store.as_ref(), &user, id).await?;
  let completions = state
    .store
    .completions_for_habit(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(completions))
}

/// `GET /habits/:id/detailed`
pub async fn detailed<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<DetailedView>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let habit = owned_habit(state.store.as_ref(), &user, id).await?;
  let completions = state
    .store
    .completions_for_habit(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stats::detailed_view(habit, completions, today())))
}

/// `GET /habits/:id/weekly`. Keys are weekdays, `0` = Sunday; weekdays
/// without completions are omitted.
pub async fn weekly<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<BTreeMap<u8, u32>>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  owned_habit(state.store.as_ref(), &user, id).await?;
  let completions = state
    .store
    .completions_for_habit(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(stats::weekly_histogram(&completions, today())))
}
