use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Console user with an optional embedded role snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier unique within the user collection.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address, unique by convention only.
    pub email: String,
    /// Role copy taken at assignment time.
    pub role: Option<Role>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Last successful login, if any.
    pub last_login: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns `first last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns the id of the embedded role snapshot.
    #[must_use]
    pub fn role_id(&self) -> Option<&str> {
        self.role.as_ref().map(|role| role.id.as_str())
    }
}
