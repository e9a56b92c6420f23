//! UserRepository trait definition.

use studyhall_types::error::RepositoryError;
use studyhall_types::user::{NewUser, User};

/// Repository trait for account persistence.
///
/// Implementations live in studyhall-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Create an account. Username and email collisions surface as
    /// [`RepositoryError::Conflict`] naming the offending column.
    fn create_user(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Get an account by id.
    fn get_user(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Get an account by username (login lookup).
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Count all accounts (dashboard stat).
    fn count_users(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
