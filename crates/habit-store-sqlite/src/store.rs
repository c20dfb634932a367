//! [`SqliteStore`], the SQLite implementation of [`HabitStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use habit_core::{
  completion::{Completion, NewCompletion},
  habit::{Habit, HabitUpdate, NewHabit},
  store::{HabitQuery, HabitStore},
  user::{NewUser, User},
};

use crate::{
  encode::{
    COMPLETION_COLUMNS, HABIT_COLUMNS, RawCompletion, RawHabit, RawUser,
    USER_COLUMNS, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A habit store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every
/// `call` runs on the connection's own thread, one at a time, so a
/// check-then-insert inside a single `call` cannot interleave with another
/// writer.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Write the mutable columns of an already-updated habit back.
  async fn write_habit(&self, habit: &Habit) -> Result<()> {
    let id_str         = encode_uuid(habit.habit_id);
    let name           = habit.name.clone();
    let description    = habit.description.clone();
    let frequency_str  = habit.frequency.as_ref().to_owned();
    let updated_at_str = habit.updated_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE habits
           SET name = ?2, description = ?3, frequency = ?4, updated_at = ?5
           WHERE habit_id = ?1",
          rusqlite::params![id_str, name, description, frequency_str, updated_at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Which unique column a new user collided with.
enum UserClash {
  Email,
  Username,
}

// ─── HabitStore impl ─────────────────────────────────────────────────────────

impl HabitStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      email:         input.email,
      username:      input.username,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let email    = user.email.clone();
    let username = user.username.clone();
    let hash     = user.password_hash.clone();
    let at_str   = encode_dt(user.created_at);

    let clash: Option<UserClash> = self
      .conn
      .call(move |conn| {
        let email_taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if email_taken {
          return Ok(Some(UserClash::Email));
        }

        let username_taken = conn
          .query_row(
            "SELECT 1 FROM users WHERE username = ?1",
            rusqlite::params![username],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if username_taken {
          return Ok(Some(UserClash::Username));
        }

        conn.execute(
          "INSERT INTO users (user_id, email, username, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, email, username, hash, at_str],
        )?;
        Ok(None)
      })
      .await?;

    match clash {
      Some(UserClash::Email) => Err(habit_core::Error::EmailTaken.into()),
      Some(UserClash::Username) => Err(habit_core::Error::UsernameTaken.into()),
      None => Ok(user),
    }
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_login(&self, login: &str) -> Result<Option<User>> {
    let login = login.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {USER_COLUMNS} FROM users
               WHERE email = ?1 OR username = ?1
               LIMIT 1"
            ),
            rusqlite::params![login],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  // ── Habits ────────────────────────────────────────────────────────────────

  async fn create_habit(&self, owner_id: Uuid, input: NewHabit) -> Result<Habit> {
    let habit = Habit {
      habit_id:    Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      frequency:   input.frequency,
      created_at:  Utc::now(),
      updated_at:  None,
      owner_id,
    };

    let id_str        = encode_uuid(habit.habit_id);
    let name          = habit.name.clone();
    let description   = habit.description.clone();
    let frequency_str = habit.frequency.as_ref().to_owned();
    let at_str        = encode_dt(habit.created_at);
    let owner_str     = encode_uuid(owner_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO habits (habit_id, name, description, frequency, created_at, owner_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, description, frequency_str, at_str, owner_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(habit)
  }

  async fn get_habit(&self, id: Uuid) -> Result<Option<Habit>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawHabit> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE habit_id = ?1"),
            rusqlite::params![id_str],
            RawHabit::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawHabit::into_habit).transpose()
  }

  async fn list_habits(&self, owner_id: Uuid, query: &HabitQuery) -> Result<Vec<Habit>> {
    let owner_str     = encode_uuid(owner_id);
    let frequency_str = query.frequency.map(|f| f.as_ref().to_owned());
    // SQLite treats a negative LIMIT as unbounded.
    let limit_val     = query.limit.map_or(-1, |l| l as i64);
    let offset_val    = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawHabit> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HABIT_COLUMNS} FROM habits
           WHERE owner_id = ?1
             AND (?2 IS NULL OR frequency = ?2)
           ORDER BY created_at, habit_id
           LIMIT ?3 OFFSET ?4"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![owner_str, frequency_str, limit_val, offset_val],
            RawHabit::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHabit::into_habit).collect()
  }

  async fn update_habit(&self, id: Uuid, update: HabitUpdate) -> Result<Option<Habit>> {
    let Some(mut habit) = self.get_habit(id).await? else {
      return Ok(None);
    };

    if habit.apply(update, Utc::now()) {
      self.write_habit(&habit).await?;
    }
    Ok(Some(habit))
  }

  async fn delete_habit(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM habits WHERE habit_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }

  // ── Completions ───────────────────────────────────────────────────────────

  async fn record_completion(&self, input: NewCompletion) -> Result<Completion> {
    let completion = Completion {
      completion_id:  Uuid::new_v4(),
      habit_id:       input.habit_id,
      completed_date: input.completed_date,
      completed_at:   Utc::now(),
      notes:          input.notes,
      rating:         input.rating,
    };

    let id_str       = encode_uuid(completion.completion_id);
    let habit_id_str = encode_uuid(completion.habit_id);
    let date_str     = encode_date(completion.completed_date);
    let at_str       = encode_dt(completion.completed_at);
    let notes        = completion.notes.clone();
    let rating       = completion.rating.map(|r| i64::from(r.get()));

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let exists = conn
          .query_row(
            "SELECT 1 FROM completions WHERE habit_id = ?1 AND completed_date = ?2",
            rusqlite::params![habit_id_str, date_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if exists {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO completions
             (completion_id, habit_id, completed_date, completed_at, notes, rating)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, habit_id_str, date_str, at_str, notes, rating],
        )?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(
        habit_core::Error::AlreadyCompleted {
          habit_id: completion.habit_id,
          date:     completion.completed_date,
        }
        .into(),
      );
    }
    Ok(completion)
  }

  async fn get_completion(&self, id: Uuid) -> Result<Option<Completion>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCompletion> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMPLETION_COLUMNS} FROM completions WHERE completion_id = ?1"),
            rusqlite::params![id_str],
            RawCompletion::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCompletion::into_completion).transpose()
  }

  async fn completions_for_habit(&self, habit_id: Uuid) -> Result<Vec<Completion>> {
    let habit_id_str = encode_uuid(habit_id);

    let raws: Vec<RawCompletion> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMPLETION_COLUMNS} FROM completions
           WHERE habit_id = ?1
           ORDER BY completed_date DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![habit_id_str], RawCompletion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCompletion::into_completion).collect()
  }

  async fn delete_completion(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM completions WHERE completion_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(removed > 0)
  }
}
