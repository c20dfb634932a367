//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, NaiveDate, Utc};
use habit_core::{
  completion::{NewCompletion, Rating},
  habit::{Frequency, HabitUpdate, NewHabit},
  stats::HabitStats,
  store::{HabitQuery, HabitStore},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(name: &str) -> NewUser {
  NewUser {
    email:         format!("{name}@example.com"),
    username:      name.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
  }
}

async fn user(s: &SqliteStore, name: &str) -> User {
  s.create_user(new_user(name)).await.unwrap()
}

fn today() -> NaiveDate { Utc::now().date_naive() }

fn days_ago(n: u64) -> NaiveDate { today().checked_sub_days(Days::new(n)).unwrap() }

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let u = user(&s, "alice").await;

  let fetched = s.get_user(u.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.username, "alice");
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.password_hash, u.password_hash);
}

#[tokio::test]
async fn find_user_by_username_or_email() {
  let s = store().await;
  let u = user(&s, "alice").await;

  let by_name = s.find_user_by_login("alice").await.unwrap().unwrap();
  let by_mail = s.find_user_by_login("alice@example.com").await.unwrap().unwrap();
  assert_eq!(by_name.user_id, u.user_id);
  assert_eq!(by_mail.user_id, u.user_id);

  assert!(s.find_user_by_login("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;

  let mut again = new_user("alice2");
  again.email = "alice@example.com".into();
  let err = s.create_user(again).await.unwrap_err();
  assert!(matches!(err, Error::Core(habit_core::Error::EmailTaken)), "{err}");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;

  let mut again = new_user("alice");
  again.email = "other@example.com".into();
  let err = s.create_user(again).await.unwrap_err();
  assert!(matches!(err, Error::Core(habit_core::Error::UsernameTaken)), "{err}");
}

// ─── Habits ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_habit() {
  let s = store().await;
  let u = user(&s, "alice").await;

  let mut input = NewHabit::new("Run");
  input.description = Some("5k".into());
  input.frequency = Frequency::Weekly;
  let habit = s.create_habit(u.user_id, input).await.unwrap();

  let fetched = s.get_habit(habit.habit_id).await.unwrap().unwrap();
  assert_eq!(fetched, habit);
  assert_eq!(fetched.owner_id, u.user_id);
  assert!(fetched.updated_at.is_none());
}

#[tokio::test]
async fn get_habit_missing_returns_none() {
  let s = store().await;
  assert!(s.get_habit(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_habits_is_owner_scoped_and_filterable() {
  let s = store().await;
  let alice = user(&s, "alice").await;
  let bob = user(&s, "bob").await;

  s.create_habit(alice.user_id, NewHabit::new("Read")).await.unwrap();
  let mut weekly = NewHabit::new("Call mum");
  weekly.frequency = Frequency::Weekly;
  s.create_habit(alice.user_id, weekly).await.unwrap();
  s.create_habit(bob.user_id, NewHabit::new("Swim")).await.unwrap();

  let all = s.list_habits(alice.user_id, &HabitQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().all(|h| h.owner_id == alice.user_id));

  let query = HabitQuery { frequency: Some(Frequency::Weekly), ..Default::default() };
  let weekly = s.list_habits(alice.user_id, &query).await.unwrap();
  assert_eq!(weekly.len(), 1);
  assert_eq!(weekly[0].name, "Call mum");
}

#[tokio::test]
async fn list_habits_paginates() {
  let s = store().await;
  let u = user(&s, "alice").await;
  for name in ["a", "b", "c"] {
    s.create_habit(u.user_id, NewHabit::new(name)).await.unwrap();
  }

  let page = HabitQuery { limit: Some(2), offset: Some(1), ..Default::default() };
  let habits = s.list_habits(u.user_id, &page).await.unwrap();
  assert_eq!(habits.len(), 2);
}

#[tokio::test]
async fn update_habit_is_partial() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let mut input = NewHabit::new("Read");
  input.description = Some("fiction".into());
  let habit = s.create_habit(u.user_id, input).await.unwrap();

  let update = HabitUpdate { name: Some("Read more".into()), ..Default::default() };
  let updated = s.update_habit(habit.habit_id, update).await.unwrap().unwrap();
  assert_eq!(updated.name, "Read more");
  assert_eq!(updated.description.as_deref(), Some("fiction"));
  assert_eq!(updated.created_at, habit.created_at);
  assert!(updated.updated_at.is_some());

  let fetched = s.get_habit(habit.habit_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Read more");
  assert_eq!(fetched.updated_at, updated.updated_at);
}

#[tokio::test]
async fn update_missing_habit_returns_none() {
  let s = store().await;
  let update = HabitUpdate { name: Some("x".into()), ..Default::default() };
  assert!(s.update_habit(Uuid::new_v4(), update).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_habit_cascades_to_completions() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();
  let c = s
    .record_completion(NewCompletion::new(habit.habit_id, today()))
    .await
    .unwrap();

  assert!(s.delete_habit(habit.habit_id).await.unwrap());
  assert!(s.get_habit(habit.habit_id).await.unwrap().is_none());
  assert!(s.get_completion(c.completion_id).await.unwrap().is_none());
  assert!(!s.delete_habit(habit.habit_id).await.unwrap());
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn record_completion_roundtrips_notes_and_rating() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();

  let mut input = NewCompletion::new(habit.habit_id, days_ago(1));
  input.notes = Some("finished chapter 3".into());
  input.rating = Some(Rating::try_from(4).unwrap());
  let c = s.record_completion(input).await.unwrap();

  let fetched = s.get_completion(c.completion_id).await.unwrap().unwrap();
  assert_eq!(fetched, c);
  assert_eq!(fetched.completed_date, days_ago(1));
  assert_eq!(fetched.rating.map(Rating::get), Some(4));
}

#[tokio::test]
async fn second_completion_on_same_day_is_rejected() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();

  s.record_completion(NewCompletion::new(habit.habit_id, today()))
    .await
    .unwrap();
  let err = s
    .record_completion(NewCompletion::new(habit.habit_id, today()))
    .await
    .unwrap_err();

  assert!(
    matches!(err, Error::Core(habit_core::Error::AlreadyCompleted { habit_id, .. }) if habit_id == habit.habit_id),
    "{err}"
  );
  assert_eq!(s.completions_for_habit(habit.habit_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn same_day_on_different_habits_is_allowed() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let a = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();
  let b = s.create_habit(u.user_id, NewHabit::new("Run")).await.unwrap();

  s.record_completion(NewCompletion::new(a.habit_id, today())).await.unwrap();
  s.record_completion(NewCompletion::new(b.habit_id, today())).await.unwrap();
}

#[tokio::test]
async fn completions_for_habit_are_newest_first() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();

  for n in [3, 0, 1] {
    s.record_completion(NewCompletion::new(habit.habit_id, days_ago(n)))
      .await
      .unwrap();
  }

  let dates: Vec<NaiveDate> = s
    .completions_for_habit(habit.habit_id)
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.completed_date)
    .collect();
  assert_eq!(dates, vec![days_ago(0), days_ago(1), days_ago(3)]);
}

#[tokio::test]
async fn delete_completion() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();
  let c = s
    .record_completion(NewCompletion::new(habit.habit_id, today()))
    .await
    .unwrap();

  assert!(s.delete_completion(c.completion_id).await.unwrap());
  assert!(!s.delete_completion(c.completion_id).await.unwrap());
  assert!(s.completions_for_habit(habit.habit_id).await.unwrap().is_empty());
}

// ─── Stats through the store ─────────────────────────────────────────────────

#[tokio::test]
async fn stats_resolve_through_sqlite() {
  let s = store().await;
  let u = user(&s, "alice").await;
  let habit = s.create_habit(u.user_id, NewHabit::new("Read")).await.unwrap();

  for n in [0, 1] {
    s.record_completion(NewCompletion::new(habit.habit_id, days_ago(n)))
      .await
      .unwrap();
  }

  // The habit was created today, so the two completions (one backdated) give
  // a rate of 200 %; that is returned as is.
  let stats = HabitStats::resolve(&s, habit.habit_id, today()).await.unwrap();
  assert_eq!(stats.current_streak, 2);
  assert_eq!(stats.completion_rate, 200.0);

  let missing = HabitStats::resolve(&s, Uuid::new_v4(), today()).await.unwrap();
  assert_eq!(missing, HabitStats::default());
}
