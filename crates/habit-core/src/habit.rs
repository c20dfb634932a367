//! Habit types: the recurring activities a user tracks.
//!
//! A habit's `created_at` never changes after creation; it anchors the
//! completion-rate calculation. All other user-facing fields can be changed
//! through a [`HabitUpdate`].

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Frequency ───────────────────────────────────────────────────────────────

/// How often the owner intends to perform a habit.
///
/// Purely descriptive: the statistics engine always works in days.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
  #[default]
  Daily,
  Weekly,
  Monthly,
}

impl Frequency {
  /// Parse the lowercase form stored in the database.
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownFrequency(s.to_owned()))
  }
}

// ─── Habit ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
  pub habit_id:    Uuid,
  pub name:        String,
  pub description: Option<String>,
  pub frequency:   Frequency,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:  DateTime<Utc>,
  /// Set whenever a [`HabitUpdate`] is applied.
  pub updated_at:  Option<DateTime<Utc>>,
  pub owner_id:    Uuid,
}

impl Habit {
  /// The calendar day (UTC) on which the habit was created.
  pub fn created_date(&self) -> NaiveDate { self.created_at.date_naive() }

  /// Overwrite every field that is `Some` in `update` and stamp
  /// `updated_at`. Returns `true` if any field was present.
  pub fn apply(&mut self, update: HabitUpdate, now: DateTime<Utc>) -> bool {
    if update.is_empty() {
      return false;
    }
    if let Some(name) = update.name {
      self.name = name;
    }
    if let Some(description) = update.description {
      self.description = Some(description);
    }
    if let Some(frequency) = update.frequency {
      self.frequency = frequency;
    }
    self.updated_at = Some(now);
    true
  }
}

// ─── NewHabit ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::HabitStore::create_habit`].
/// `habit_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHabit {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub frequency:   Frequency,
}

impl NewHabit {
  /// Convenience constructor: no description, daily frequency.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), description: None, frequency: Frequency::default() }
  }
}

// ─── HabitUpdate ─────────────────────────────────────────────────────────────

/// A partial update. `None` fields are left untouched; there is no way to
/// clear a description back to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitUpdate {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub frequency:   Option<Frequency>,
}

impl HabitUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.description.is_none() && self.frequency.is_none()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn habit() -> Habit {
    Habit {
      habit_id:    Uuid::new_v4(),
      name:        "Read".into(),
      description: Some("20 pages".into()),
      frequency:   Frequency::Daily,
      created_at:  Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
      updated_at:  None,
      owner_id:    Uuid::new_v4(),
    }
  }

  #[test]
  fn apply_overwrites_only_present_fields() {
    let mut h = habit();
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

    let changed = h.apply(
      HabitUpdate { frequency: Some(Frequency::Weekly), ..Default::default() },
      now,
    );

    assert!(changed);
    assert_eq!(h.name, "Read");
    assert_eq!(h.description.as_deref(), Some("20 pages"));
    assert_eq!(h.frequency, Frequency::Weekly);
    assert_eq!(h.updated_at, Some(now));
  }

  #[test]
  fn empty_update_leaves_habit_untouched() {
    let mut h = habit();
    let before = h.clone();
    let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();

    assert!(!h.apply(HabitUpdate::default(), now));
    assert_eq!(h, before);
  }

  #[test]
  fn apply_never_moves_created_at() {
    let mut h = habit();
    let created = h.created_at;
    let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
    h.apply(HabitUpdate { name: Some("Read more".into()), ..Default::default() }, now);
    assert_eq!(h.created_at, created);
  }

  #[test]
  fn frequency_parses_lowercase_and_rejects_unknown() {
    assert_eq!(Frequency::parse("monthly").unwrap(), Frequency::Monthly);
    assert_eq!(Frequency::Weekly.as_ref(), "weekly");
    assert!(matches!(
      Frequency::parse("hourly"),
      Err(Error::UnknownFrequency(s)) if s == "hourly"
    ));
  }

  #[test]
  fn new_habit_defaults_to_daily() {
    let body: NewHabit = serde_json::from_str(r#"{"name":"Stretch"}"#).unwrap();
    assert_eq!(body.frequency, Frequency::Daily);
    assert!(body.description.is_none());
  }
}
