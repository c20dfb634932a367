pub mod auth;
pub mod completions;
pub mod habits;
pub mod meta;
pub mod stats;

use chrono::{NaiveDate, Utc};
use habit_core::{habit::Habit, store::HabitStore, user::User};
use uuid::Uuid;

use crate::error::ApiError;

/// The calendar day every statistic in a request is computed against.
pub(crate) fn today() -> NaiveDate { Utc::now().date_naive() }

/// Resolve a habit owned by `user`. Another user's habit is reported exactly
/// like a missing one.
pub(crate) async fn owned_habit<S: HabitStore>(
  store: &S,
  user: &User,
  habit_id: Uuid,
) -> Result<Habit, ApiError> {
  store
    .get_habit(habit_id)
    .await
    .map_err(ApiError::store)?
    .filter(|h| h.owner_id == user.user_id)
    .ok_or_else(|| ApiError::from(habit_core::Error::HabitNotFound(habit_id)))
}
