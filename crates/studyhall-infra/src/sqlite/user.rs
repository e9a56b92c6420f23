//! SQLite user repository implementation.
//!
//! UNIQUE violations on username/email are translated into
//! `RepositoryError::Conflict` naming the offending column so the API
//! layer can report which field collided.

use chrono::Utc;
use sqlx::Row;

use studyhall_core::repository::user::UserRepository;
use studyhall_types::error::RepositoryError;
use studyhall_types::user::{NewUser, User, UserRole};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    is_active: i64,
    role: String,
    created_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_active: row.try_get("is_active")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let role: UserRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            is_active: self.is_active != 0,
            role,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// Map a sqlx error to Conflict when a UNIQUE constraint fired.
fn map_insert_error(e: sqlx::Error) -> RepositoryError {
    let text = e.to_string();
    if text.contains("UNIQUE constraint failed: users.username") {
        RepositoryError::Conflict("username".to_string())
    } else if text.contains("UNIQUE constraint failed: users.email") {
        RepositoryError::Conflict("email".to_string())
    } else {
        RepositoryError::Query(text)
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO users (username, email, password_hash, is_active, role, created_at)
               VALUES (?, ?, ?, 1, ?, ?)"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.to_string())
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_insert_error)?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            is_active: true,
            role: user.role,
            created_at,
        })
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$stub".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        let created = repo.create_user(&make_user("ada")).await.unwrap();
        assert!(created.is_active);
        assert_eq!(created.role, UserRole::Student);

        let by_id = repo.get_user(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "ada");

        let by_name = repo.get_by_username("ada").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&make_user("ada")).await.unwrap();

        let mut dup = make_user("ada");
        dup.email = "other@example.com".to_string();
        let err = repo.create_user(&dup).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref col) if col == "username"));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        repo.create_user(&make_user("ada")).await.unwrap();

        let mut dup = make_user("grace");
        dup.email = "ada@example.com".to_string();
        let err = repo.create_user(&dup).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(ref col) if col == "email"));
    }

    #[tokio::test]
    async fn test_count_users() {
        let pool = test_pool().await;
        let repo = SqliteUserRepository::new(pool);

        assert_eq!(repo.count_users().await.unwrap(), 0);
        repo.create_user(&make_user("ada")).await.unwrap();
        repo.create_user(&make_user("grace")).await.unwrap();
        assert_eq!(repo.count_users().await.unwrap(), 2);
    }
}
