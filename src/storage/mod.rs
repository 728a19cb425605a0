//! Persistence ports for the portal.
//!
//! Handlers receive a [`DynStorage`] handle; backends implement [`Storage`].

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::models::{Mentor, Student};

pub mod sqlx;

pub use self::sqlx::SqlxStorage;

/// Failure inside a storage backend. Carries the underlying cause for
/// logging; never surfaced to the client directly.
#[derive(Debug)]
pub struct StorageError {
    message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StorageError {}

/// Trait implemented by all persistence backends.
///
/// Registration records are created by the registration flow; the login flow
/// only checks existence. A lookup that finds no row returns `Ok(None)`, not
/// an error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the backing store (bootstrap schema, verify connectivity).
    async fn init(&self) -> Result<(), StorageError>;

    async fn save_student(&self, student: &Student) -> Result<(), StorageError>;
    async fn get_student_by_username(&self, username: &str)
        -> Result<Option<Student>, StorageError>;

    async fn save_mentor(&self, mentor: &Mentor) -> Result<(), StorageError>;
    async fn get_mentor_by_username(&self, username: &str) -> Result<Option<Mentor>, StorageError>;

    /// Lightweight liveness/readiness check.
    ///
    /// Implementations may override to do something cheaper than `init()`.
    async fn healthcheck(&self) -> Result<(), StorageError> {
        self.init().await
    }
}

pub type DynStorage = Arc<dyn Storage>;

/// Build the storage backend matching the database URL.
pub async fn create_storage(database_url: &str) -> Result<DynStorage, StorageError> {
    let storage = SqlxStorage::new(database_url)
        .await
        .map_err(|err| StorageError::new(err.to_string()))?;
    Ok(Arc::new(storage))
}
