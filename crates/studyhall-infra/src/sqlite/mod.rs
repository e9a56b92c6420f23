//! SQLite-backed repository implementations.

pub mod chat;
pub mod course;
pub mod note;
pub mod pool;
pub mod user;

use chrono::{DateTime, Utc};
use studyhall_types::error::RepositoryError;

/// Parse an RFC 3339 text column into a UTC timestamp.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Format a UTC timestamp for storage.
///
/// All rows use the same fixed-offset RFC 3339 form, so lexicographic
/// ORDER BY on the column is chronological.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}
