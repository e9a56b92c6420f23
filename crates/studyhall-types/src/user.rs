//! User account types and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Account role controlling access to admin and analytics surfaces.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (role IN ('owner', 'admin', 'student'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    Student,
}

impl UserRole {
    /// Whether this role may manage courses and course content.
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Owner => write!(f, "owner"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Student => write!(f, "student"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(UserRole::Owner),
            "admin" => Ok(UserRole::Admin),
            "student" => Ok(UserRole::Student),
            other => Err(format!("invalid user role: '{other}'")),
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

/// A registered account.
///
/// `password_hash` is an argon2 PHC string and never leaves the backend;
/// serialize [`UserProfile`] instead when responding to clients.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Client-safe view of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_active: self.is_active,
            role: self.role,
        }
    }
}

/// Account fields exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_active: bool,
    pub role: UserRole,
}

/// Fields required to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Owner, UserRole::Admin, UserRole::Student] {
            let s = role.to_string();
            let parsed: UserRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_user_role_default() {
        assert_eq!(UserRole::default(), UserRole::Student);
    }

    #[test]
    fn test_admin_check() {
        assert!(UserRole::Owner.is_admin());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Student.is_admin());
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User {
            id: 1,
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            is_active: true,
            role: UserRole::Student,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user.profile()).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"username\":\"ada\""));
    }
}
