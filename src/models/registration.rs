use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered student. Created by the registration flow; the login flow only
/// checks existence by username.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(username: String, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registered mentor. Same shape as [`Student`] but lives in its own table;
/// a username may be registered under both roles independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mentor {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mentor {
    pub fn new(username: String, name: String, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}
