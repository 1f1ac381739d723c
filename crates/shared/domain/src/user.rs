//! User domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User record as persisted in the `users` table.
///
/// `id` and `created_at` are assigned by the store on insert and never change
/// afterwards; `updated_at` tracks the last successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Store-assigned identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i64,
    /// Display name
    #[cfg_attr(feature = "openapi", schema(example = "Alice"))]
    pub name: String,
    /// Email address
    #[cfg_attr(feature = "openapi", schema(example = "alice@example.com"))]
    pub email: String,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check whether the record has been updated since it was inserted
    pub fn is_modified(&self) -> bool {
        self.updated_at > self.created_at
    }
}
