//! Error types for `habit-core`.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("habit not found: {0}")]
  HabitNotFound(Uuid),

  #[error("completion not found: {0}")]
  CompletionNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("email already registered")]
  EmailTaken,

  #[error("username already taken")]
  UsernameTaken,

  #[error("habit {habit_id} already completed on {date}")]
  AlreadyCompleted { habit_id: Uuid, date: NaiveDate },

  #[error("rating must be between 1 and 5, got {0}")]
  InvalidRating(u8),

  #[error("unknown frequency: {0:?}")]
  UnknownFrequency(String),
}

impl Error {
  /// Whether this error is a rejected write caused by the caller's input
  /// rather than a missing record.
  pub fn is_conflict(&self) -> bool {
    matches!(
      self,
      Self::EmailTaken
        | Self::UsernameTaken
        | Self::AlreadyCompleted { .. }
        | Self::InvalidRating(_)
        | Self::UnknownFrequency(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
