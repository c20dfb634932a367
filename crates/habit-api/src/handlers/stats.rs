//! Handler for `GET /stats/overview`.

use axum::{Json, extract::State};
use habit_core::{
  stats::{self, Overview},
  store::{HabitQuery, HabitStore},
};

use super::today;
use crate::{AppState, auth::CurrentUser, error::ApiError};

/// `GET /stats/overview`: totals across the caller's habits plus the five
/// longest live streaks.
pub async fn overview<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Overview>, ApiError>
where
  S: HabitStore + Clone + 'static,
{
  let habits = state
    .store
    .list_habits(user.user_id, &HabitQuery::default())
    .await
    .map_err(ApiError::store)?;

  let mut histories = Vec::with_capacity(habits.len());
  for habit in &habits {
    histories.push(
      state
        .store
        .completions_for_habit(habit.habit_id)
        .await
        .map_err(ApiError::store)?,
    );
  }

  let pairs = habits.iter().zip(histories.iter().map(Vec::as_slice));
  Ok(Json(stats::overview(pairs, today())))
}
