//! Personal study note types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-form note owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}
