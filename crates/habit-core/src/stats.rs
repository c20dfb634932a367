//! The statistics engine: completion rate, current streak, and the read
//! models built from them.
//!
//! Everything here is a pure function of a habit, its completions, and the
//! caller's notion of `today`. Nothing reads a clock or touches storage, except
//! [`HabitStats::resolve`], which only fetches through a [`HabitStore`] and
//! then defers to the pure functions.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{completion::Completion, habit::Habit, store::HabitStore};

/// Size of the trailing window, in days, covered by [`weekly_histogram`].
pub const HISTOGRAM_WINDOW_DAYS: u64 = 28;

/// Maximum number of entries in [`Overview::longest_streaks`].
pub const OVERVIEW_STREAK_LIMIT: usize = 5;

// ─── Primitives ──────────────────────────────────────────────────────────────

/// Number of calendar days the habit has existed, counting both its creation
/// day and `today`. Never less than 1.
pub fn days_existed(habit: &Habit, today: NaiveDate) -> i64 {
  let elapsed = today.signed_duration_since(habit.created_date()).num_days();
  elapsed.saturating_add(1).max(1)
}

/// Completions as a percentage of [`days_existed`].
///
/// Not clamped: if more completions exist than days (only possible when the
/// one-per-day invariant was bypassed) the result exceeds 100.
pub fn completion_rate(
  habit: &Habit,
  completions: &[Completion],
  today: NaiveDate,
) -> f64 {
  completions.len() as f64 / days_existed(habit, today) as f64 * 100.0
}

/// Length of the run of consecutive days, ending today or yesterday, on which
/// the habit was completed.
///
/// Walks distinct completion dates from newest to oldest. Each date must be
/// the cursor itself or the day before it; the first gap ends the walk.
pub fn current_streak(completions: &[Completion], today: NaiveDate) -> u32 {
  let mut dates: Vec<NaiveDate> =
    completions.iter().map(|c| c.completed_date).collect();
  dates.sort_unstable_by(|a, b| b.cmp(a));
  dates.dedup();

  let mut streak = 0;
  let mut cursor = today;
  for date in dates {
    if date == cursor || Some(date) == cursor.pred_opt() {
      streak += 1;
      cursor = date;
    } else {
      break;
    }
  }
  streak
}

/// Completion counts per day of week (`0` = Sunday … `6` = Saturday) over
/// the last [`HISTOGRAM_WINDOW_DAYS`] days.
///
/// Sparse: a weekday with no completions in the window has no entry.
pub fn weekly_histogram(
  completions: &[Completion],
  today: NaiveDate,
) -> BTreeMap<u8, u32> {
  let window_start = today
    .checked_sub_days(Days::new(HISTOGRAM_WINDOW_DAYS))
    .unwrap_or(NaiveDate::MIN);

  let mut histogram = BTreeMap::new();
  for completion in completions
    .iter()
    .filter(|c| c.completed_date >= window_start)
  {
    let weekday = completion.completed_date.weekday().num_days_from_sunday() as u8;
    *histogram.entry(weekday).or_insert(0) += 1;
  }
  histogram
}

/// Round a percentage to two decimal places for presentation.
pub fn round_rate(rate: f64) -> f64 { (rate * 100.0).round() / 100.0 }

// ─── HabitStats ──────────────────────────────────────────────────────────────

/// The two headline numbers for a habit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HabitStats {
  pub completion_rate: f64,
  pub current_streak:  u32,
}

impl HabitStats {
  pub fn compute(
    habit: &Habit,
    completions: &[Completion],
    today: NaiveDate,
  ) -> Self {
    Self {
      completion_rate: completion_rate(habit, completions, today),
      current_streak:  current_streak(completions, today),
    }
  }

  /// Fetch a habit and its completions through `store` and compute its
  /// stats. A habit that cannot be resolved yields the zero default; callers
  /// are expected to have reported "not found" already.
  pub async fn resolve<S: HabitStore>(
    store: &S,
    habit_id: Uuid,
    today: NaiveDate,
  ) -> Result<Self, S::Error> {
    let Some(habit) = store.get_habit(habit_id).await? else {
      return Ok(Self::default());
    };
    let completions = store.completions_for_habit(habit_id).await?;
    Ok(Self::compute(&habit, &completions, today))
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// One row of the "today" dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayView {
  #[serde(flatten)]
  pub habit:           Habit,
  /// The completion dated today, if any. Never more than one entry.
  pub completions:     Vec<Completion>,
  pub completion_rate: f64,
  pub current_streak:  u32,
  pub completed_today: bool,
}

/// Build the dashboard row for one habit. Rows for different habits share no
/// state and may be built in any order.
pub fn today_view(
  habit: Habit,
  completions: &[Completion],
  today: NaiveDate,
) -> TodayView {
  let stats = HabitStats::compute(&habit, completions, today);
  let todays: Vec<Completion> = completions
    .iter()
    .find(|c| c.completed_date == today)
    .cloned()
    .into_iter()
    .collect();

  TodayView {
    habit,
    completed_today: !todays.is_empty(),
    completions: todays,
    completion_rate: round_rate(stats.completion_rate),
    current_streak: stats.current_streak,
  }
}

/// A habit with its full history and stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedView {
  #[serde(flatten)]
  pub habit:           Habit,
  /// Most recent first.
  pub completions:     Vec<Completion>,
  pub completion_rate: f64,
  pub current_streak:  u32,
}

pub fn detailed_view(
  habit: Habit,
  mut completions: Vec<Completion>,
  today: NaiveDate,
) -> DetailedView {
  let stats = HabitStats::compute(&habit, &completions, today);
  completions.sort_by(|a, b| b.completed_date.cmp(&a.completed_date));
  DetailedView {
    habit,
    completions,
    completion_rate: round_rate(stats.completion_rate),
    current_streak: stats.current_streak,
  }
}

/// One entry of [`Overview::longest_streaks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakEntry {
  pub habit_id:   Uuid,
  pub habit_name: String,
  pub streak:     u32,
}

/// Totals across every habit a user owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
  pub total_habits:      usize,
  pub total_completions: usize,
  /// Habits with a live streak, longest first, at most
  /// [`OVERVIEW_STREAK_LIMIT`] of them.
  pub longest_streaks:   Vec<StreakEntry>,
}

pub fn overview<'a, I>(habits: I, today: NaiveDate) -> Overview
where
  I: IntoIterator<Item = (&'a Habit, &'a [Completion])>,
{
  let mut out = Overview::default();
  for (habit, completions) in habits {
    out.total_habits += 1;
    out.total_completions += completions.len();

    let streak = current_streak(completions, today);
    if streak > 0 {
      out.longest_streaks.push(StreakEntry {
        habit_id: habit.habit_id,
        habit_name: habit.name.clone(),
        streak,
      });
    }
  }
  // Stable: ties keep the caller's habit order.
  out.longest_streaks.sort_by(|a, b| b.streak.cmp(&a.streak));
  out.longest_streaks.truncate(OVERVIEW_STREAK_LIMIT);
  out
}
