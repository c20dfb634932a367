//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, calendar dates are `YYYY-MM-DD`, UUIDs
//! are hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use habit_core::{
  completion::{Completion, Rating},
  habit::{Frequency, Habit},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_rating(v: i64) -> Result<Rating> {
  let byte = u8::try_from(v).map_err(|_| habit_core::Error::InvalidRating(u8::MAX))?;
  Ok(Rating::try_from(byte)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, email, username, password_hash, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub email:         String,
  pub username:      String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      email:         row.get(1)?,
      username:      row.get(2)?,
      password_hash: row.get(3)?,
      created_at:    row.get(4)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      username:      self.username,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

pub const HABIT_COLUMNS: &str =
  "habit_id, name, description, frequency, created_at, updated_at, owner_id";

/// Raw values read directly from a `habits` row.
pub struct RawHabit {
  pub habit_id:    String,
  pub name:        String,
  pub description: Option<String>,
  pub frequency:   String,
  pub created_at:  String,
  pub updated_at:  Option<String>,
  pub owner_id:    String,
}

impl RawHabit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      habit_id:    row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      frequency:   row.get(3)?,
      created_at:  row.get(4)?,
      updated_at:  row.get(5)?,
      owner_id:    row.get(6)?,
    })
  }

  pub fn into_habit(self) -> Result<Habit> {
    Ok(Habit {
      habit_id:    decode_uuid(&self.habit_id)?,
      name:        self.name,
      description: self.description,
      frequency:   Frequency::parse(&self.frequency)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  self.updated_at.as_deref().map(decode_dt).transpose()?,
      owner_id:    decode_uuid(&self.owner_id)?,
    })
  }
}

pub const COMPLETION_COLUMNS: &str =
  "completion_id, habit_id, completed_date, completed_at, notes, rating";

/// Raw values read directly from a `completions` row.
pub struct RawCompletion {
  pub completion_id:  String,
  pub habit_id:       String,
  pub completed_date: String,
  pub completed_at:   String,
  pub notes:          Option<String>,
  pub rating:         Option<i64>,
}

impl RawCompletion {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      completion_id:  row.get(0)?,
      habit_id:       row.get(1)?,
      completed_date: row.get(2)?,
      completed_at:   row.get(3)?,
      notes:          row.get(4)?,
      rating:         row.get(5)?,
    })
  }

  pub fn into_completion(self) -> Result<Completion> {
    Ok(Completion {
      completion_id:  decode_uuid(&self.completion_id)?,
      habit_id:       decode_uuid(&self.habit_id)?,
      completed_date: decode_date(&self.completed_date)?,
      completed_at:   decode_dt(&self.completed_at)?,
      notes:          self.notes,
      rating:         self.rating.map(decode_rating).transpose()?,
    })
  }
}
