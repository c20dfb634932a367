//! Completion records, one per habit per calendar day.
//!
//! Completions are never updated. They are created once and may be deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── Rating ──────────────────────────────────────────────────────────────────

/// A self-assessed rating, always in `1..=5`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<u8> for Rating {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    if (Self::MIN..=Self::MAX).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::InvalidRating(value))
    }
  }
}

impl From<Rating> for u8 {
  fn from(r: Rating) -> Self { r.0 }
}

// ─── Completion ──────────────────────────────────────────────────────────────

/// A dated record asserting a habit was performed on `completed_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
  pub completion_id:  Uuid,
  pub habit_id:       Uuid,
  /// The day the habit was performed; streaks and rates count these.
  pub completed_date: NaiveDate,
  /// When the completion was logged.
  pub completed_at:   DateTime<Utc>,
  pub notes:          Option<String>,
  pub rating:         Option<Rating>,
}

// ─── NewCompletion ───────────────────────────────────────────────────────────

/// Input to [`crate::store::HabitStore::record_completion`].
#[derive(Debug, Clone)]
pub struct NewCompletion {
  pub habit_id:       Uuid,
  pub completed_date: NaiveDate,
  pub notes:          Option<String>,
  pub rating:         Option<Rating>,
}

impl NewCompletion {
  pub fn new(habit_id: Uuid, completed_date: NaiveDate) -> Self {
    Self { habit_id, completed_date, notes: None, rating: None }
  }
}
