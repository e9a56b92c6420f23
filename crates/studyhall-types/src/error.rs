use thiserror::Error;

/// Errors from repository operations (used by trait definitions in studyhall-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the chat orchestration flow.
///
/// Generation-side failures never appear here: the generation client
/// degrades them to text, so a chat turn fails only on bad input or a
/// missing/foreign session.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Session id given but the session does not exist or belongs to
    /// another user. The two cases are deliberately indistinguishable.
    #[error("session not found")]
    SessionNotFound,

    #[error("message text must not be empty")]
    EmptyMessage,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Errors related to authentication and account management.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("account is deactivated")]
    Inactive,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("password hashing error")]
    Hashing,

    #[error("storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatError::Repository(_)));
    }

    #[test]
    fn test_auth_error_display() {
        let err = AuthError::UsernameTaken("ada".to_string());
        assert_eq!(err.to_string(), "username 'ada' is already taken");
    }
}
