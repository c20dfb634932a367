//! User accounts: the owners of habits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub email:         String,
  pub username:      String,
  /// PHC string produced by argon2. Never leaves the server.
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::HabitStore::create_user`]. The password must
/// already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub username:      String,
  pub password_hash: String,
}
