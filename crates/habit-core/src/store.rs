//! The `HabitStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `habit-store-sqlite`).
//! The API layer and [`crate::stats`] depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  completion::{Completion, NewCompletion},
  habit::{Frequency, Habit, HabitUpdate, NewHabit},
  user::{NewUser, User},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`HabitStore::list_habits`].
#[derive(Debug, Clone, Default)]
pub struct HabitQuery {
  pub frequency: Option<Frequency>,
  /// `None` means no limit.
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a habit-tracker storage backend.
///
/// Ownership is not checked here: callers resolve a habit and compare its
/// `owner_id` before acting on it.
///
/// Write rejections caused by input (duplicate email, a second completion for
/// the same day) must surface as a [`crate::Error`] somewhere in the
/// returned error's `source()` chain.
pub trait HabitStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with [`crate::Error::EmailTaken`] or
  /// [`crate::Error::UsernameTaken`] if either is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look a user up by username or email, whichever matches.
  fn find_user_by_login<'a>(
    &'a self,
    login: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  // ── Habits ────────────────────────────────────────────────────────────

  fn create_habit(
    &self,
    owner_id: Uuid,
    input: NewHabit,
  ) -> impl Future<Output = Result<Habit, Self::Error>> + Send + '_;

  /// Retrieve a habit by UUID. Returns `None` if not found.
  fn get_habit(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// List the habits owned by `owner_id`, oldest first.
  fn list_habits<'a>(
    &'a self,
    owner_id: Uuid,
    query: &'a HabitQuery,
  ) -> impl Future<Output = Result<Vec<Habit>, Self::Error>> + Send + 'a;

  /// Apply a partial update. Returns `None` if the habit does not exist.
  fn update_habit(
    &self,
    id: Uuid,
    update: HabitUpdate,
  ) -> impl Future<Output = Result<Option<Habit>, Self::Error>> + Send + '_;

  /// Delete a habit and all of its completions. Returns `false` if the habit
  /// did not exist.
  fn delete_habit(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Completions ───────────────────────────────────────────────────────

  /// Record a completion. Fails with [`crate::Error::AlreadyCompleted`] if
  /// the habit already has one for `input.completed_date`.
  fn record_completion(
    &self,
    input: NewCompletion,
  ) -> impl Future<Output = Result<Completion, Self::Error>> + Send + '_;

  fn get_completion(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Completion>, Self::Error>> + Send + '_;

  /// All completions of a habit, most recent `completed_date` first.
  fn completions_for_habit(
    &self,
    habit_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Completion>, Self::Error>> + Send + '_;

  /// Returns `false` if the completion did not exist.
  fn delete_completion(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
