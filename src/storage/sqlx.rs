use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Postgres, Sqlite};
use std::borrow::Cow;
use std::path::PathBuf;

use crate::models::{Mentor, Student};
use crate::storage::{Storage, StorageError};

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Clone, Debug)]
enum DatabasePool {
    Sqlite(Pool<Sqlite>),
    Postgres(Pool<Postgres>),
}

/// SQL-backed storage (SQLite/Postgres) using SQLx. The backend is selected
/// from the database URL at startup.
pub struct SqlxStorage {
    pool: DatabasePool,
}

impl SqlxStorage {
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = if database_url.starts_with("postgres") {
            DatabasePool::Postgres(Pool::<Postgres>::connect(database_url).await?)
        } else if database_url.starts_with("sqlite::memory:") {
            // A pooled ":memory:" database gives every connection its own
            // empty database; clamp to a single persistent connection so the
            // bootstrapped schema is visible to all queries.
            DatabasePool::Sqlite(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect(database_url)
                    .await?,
            )
        } else {
            // Local/dev defaults commonly point at a file that doesn't exist
            // yet; pre-create the parent directory and the file so connect
            // doesn't fail with "unable to open database file".
            if let Some(path) = sqlite_db_path(database_url) {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        let _ = std::fs::create_dir_all(parent);
                    }
                }

                if !path.as_os_str().is_empty() && !path.exists() {
                    let _ = std::fs::File::create(&path);
                }
            }

            let connect_url = sqlite_url_with_create_mode(database_url);
            DatabasePool::Sqlite(Pool::<Sqlite>::connect(connect_url.as_ref()).await?)
        };

        Ok(Self { pool })
    }

    async fn init_sqlx(&self) -> Result<(), sqlx::Error> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                self.bootstrap_sqlite_schema(pool).await?;
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::Postgres(pool) => {
                self.bootstrap_postgres_schema(pool).await?;
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }

        Ok(())
    }

    async fn bootstrap_sqlite_schema(&self, pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
        // Idempotent and cheap; keeps local/dev and test runs migration-free.
        for table in ["students", "mentors"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                "#
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                r#"CREATE INDEX IF NOT EXISTS idx_{table}_username ON {table}(username);"#
            ))
            .execute(pool)
            .await?;
        }

        Ok(())
    }

    async fn bootstrap_postgres_schema(&self, pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
        for table in ["students", "mentors"] {
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id TEXT PRIMARY KEY,
                    username TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL,
                    updated_at TIMESTAMPTZ NOT NULL
                );
                "#
            ))
            .execute(pool)
            .await?;

            sqlx::query(&format!(
                r#"CREATE INDEX IF NOT EXISTS idx_{table}_username ON {table}(username);"#
            ))
            .execute(pool)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Storage for SqlxStorage {
    async fn init(&self) -> Result<(), StorageError> {
        self.init_sqlx().await.map_err(Into::into)
    }

    async fn healthcheck(&self) -> Result<(), StorageError> {
        // Keep readiness/liveness cheap: don't re-run bootstrap.
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
            }
        }

        Ok(())
    }

    async fn save_student(&self, student: &Student) -> Result<(), StorageError> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO students (id, username, name, email, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&student.id)
                .bind(&student.username)
                .bind(&student.name)
                .bind(&student.email)
                .bind(student.created_at)
                .bind(student.updated_at)
                .execute(pool)
                .await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO students (id, username, name, email, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(&student.id)
                .bind(&student.username)
                .bind(&student.name)
                .bind(&student.email)
                .bind(student.created_at)
                .bind(student.updated_at)
                .execute(pool)
                .await?;
            }
        }

        Ok(())
    }

    async fn get_student_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Student>, StorageError> {
        let student = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, Student>("SELECT * FROM students WHERE username = ?")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, Student>("SELECT * FROM students WHERE username = $1")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
        };

        Ok(student)
    }

    async fn save_mentor(&self, mentor: &Mentor) -> Result<(), StorageError> {
        match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO mentors (id, username, name, email, created_at, updated_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&mentor.id)
                .bind(&mentor.username)
                .bind(&mentor.name)
                .bind(&mentor.email)
                .bind(mentor.created_at)
                .bind(mentor.updated_at)
                .execute(pool)
                .await?;
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO mentors (id, username, name, email, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(&mentor.id)
                .bind(&mentor.username)
                .bind(&mentor.name)
                .bind(&mentor.email)
                .bind(mentor.created_at)
                .bind(mentor.updated_at)
                .execute(pool)
                .await?;
            }
        }

        Ok(())
    }

    async fn get_mentor_by_username(&self, username: &str) -> Result<Option<Mentor>, StorageError> {
        let mentor = match &self.pool {
            DatabasePool::Sqlite(pool) => {
                sqlx::query_as::<_, Mentor>("SELECT * FROM mentors WHERE username = ?")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
            DatabasePool::Postgres(pool) => {
                sqlx::query_as::<_, Mentor>("SELECT * FROM mentors WHERE username = $1")
                    .bind(username)
                    .fetch_optional(pool)
                    .await?
            }
        };

        Ok(mentor)
    }
}

fn sqlite_db_path(database_url: &str) -> Option<PathBuf> {
    if !database_url.starts_with("sqlite:") {
        return None;
    }
    if database_url.starts_with("sqlite::memory:") {
        return None;
    }

    let mut rest = &database_url["sqlite:".len()..];

    // Normalize URL-ish forms into a filesystem-ish path by reducing multiple
    // leading slashes to a single leading slash.
    if rest.starts_with("///") {
        rest = &rest[2..];
    } else if rest.starts_with("//") {
        rest = &rest[1..];
    }

    // Drop any query string.
    let path_part = rest.split('?').next().unwrap_or(rest);
    if path_part.is_empty() {
        return None;
    }

    Some(PathBuf::from(path_part))
}

fn sqlite_url_with_create_mode(database_url: &str) -> Cow<'_, str> {
    if !database_url.starts_with("sqlite:") {
        return Cow::Borrowed(database_url);
    }
    if database_url.starts_with("sqlite::memory:") {
        return Cow::Borrowed(database_url);
    }

    // SQLite URI mode will not create the file unless asked to.
    if database_url.contains("mode=") {
        return Cow::Borrowed(database_url);
    }

    let sep = if database_url.contains('?') { '&' } else { '?' };
    Cow::Owned(format!("{database_url}{sep}mode=rwc"))
}
