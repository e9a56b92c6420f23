//! Course catalog, course content, and enrollment types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A purchasable course in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Price in cents; revenue is summed in cents to avoid float drift.
    pub price_cents: i64,
    pub image_url: String,
}

/// Fields required to create a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_url: String,
}

/// Kind of a course content item.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('video', 'text'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Text,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Video => write!(f, "video"),
            ContentKind::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "video" => Ok(ContentKind::Video),
            "text" => Ok(ContentKind::Text),
            other => Err(format!("invalid content kind: '{other}'")),
        }
    }
}

/// One lesson or resource within a course.
///
/// `data` holds a URL for videos and the body itself for text items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseContent {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub kind: ContentKind,
    pub data: String,
}

/// Fields required to attach content to a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseContent {
    pub title: String,
    pub kind: ContentKind,
    pub data: String,
}

/// A user's paid membership in a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub user_id: i64,
    pub course_id: i64,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_roundtrip() {
        for kind in [ContentKind::Video, ContentKind::Text] {
            let s = kind.to_string();
            let parsed: ContentKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_content_kind_rejects_unknown() {
        assert!("pdf".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_course_serialize() {
        let course = Course {
            id: 1,
            title: "AI Engineering 101".to_string(),
            description: "Integrate LLMs into apps".to_string(),
            price_cents: 5999,
            image_url: "https://example.com/ai.png".to_string(),
        };
        let json = serde_json::to_string(&course).unwrap();
        assert!(json.contains("\"price_cents\":5999"));
    }
}
