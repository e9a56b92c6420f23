//! SQLite course repository implementation.
//!
//! Enrollment uses `INSERT OR IGNORE` on the (user_id, course_id)
//! primary key, so buying a course twice is naturally idempotent.

use chrono::Utc;
use sqlx::Row;

use studyhall_core::repository::course::CourseRepository;
use studyhall_types::course::{ContentKind, Course, CourseContent, NewCourse, NewCourseContent};
use studyhall_types::error::RepositoryError;

use super::format_datetime;
use super::pool::DatabasePool;

/// SQLite-backed implementation of `CourseRepository`.
pub struct SqliteCourseRepository {
    pool: DatabasePool,
}

impl SqliteCourseRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn course_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Course, RepositoryError> {
    let read = || -> Result<Course, sqlx::Error> {
        Ok(Course {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price_cents: row.try_get("price_cents")?,
            image_url: row.try_get("image_url")?,
        })
    };
    read().map_err(|e| RepositoryError::Query(e.to_string()))
}

fn content_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<CourseContent, RepositoryError> {
    let kind_str: String = row
        .try_get("kind")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let kind: ContentKind = kind_str
        .parse()
        .map_err(|e: String| RepositoryError::Query(e))?;

    let read = || -> Result<CourseContent, sqlx::Error> {
        Ok(CourseContent {
            id: row.try_get("id")?,
            course_id: row.try_get("course_id")?,
            title: row.try_get("title")?,
            kind,
            data: row.try_get("data")?,
        })
    };
    read().map_err(|e| RepositoryError::Query(e.to_string()))
}

async fn count_scalar(pool: &DatabasePool, sql: &str) -> Result<u64, RepositoryError> {
    let row = sqlx::query(sql)
        .fetch_one(&pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let count: i64 = row
        .try_get("cnt")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(count as u64)
}

impl CourseRepository for SqliteCourseRepository {
    async fn create_course(&self, course: &NewCourse) -> Result<Course, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO courses (title, description, price_cents, image_url)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.price_cents)
        .bind(&course.image_url)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Course {
            id: result.last_insert_rowid(),
            title: course.title.clone(),
            description: course.description.clone(),
            price_cents: course.price_cents,
            image_url: course.image_url.clone(),
        })
    }

    async fn get_course(&self, course_id: i64) -> Result<Option<Course>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM courses WHERE id = ?")
            .bind(course_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(course_from_row).transpose()
    }

    async fn list_courses(&self) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM courses ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(course_from_row).collect()
    }

    async fn add_content(
        &self,
        course_id: i64,
        content: &NewCourseContent,
    ) -> Result<CourseContent, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO course_contents (course_id, title, kind, data) VALUES (?, ?, ?, ?)",
        )
        .bind(course_id)
        .bind(&content.title)
        .bind(content.kind.to_string())
        .bind(&content.data)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(CourseContent {
            id: result.last_insert_rowid(),
            course_id,
            title: content.title.clone(),
            kind: content.kind,
            data: content.data.clone(),
        })
    }

    async fn list_content(&self, course_id: i64) -> Result<Vec<CourseContent>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM course_contents WHERE course_id = ? ORDER BY id ASC")
            .bind(course_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(content_from_row).collect()
    }

    async fn enroll(&self, user_id: i64, course_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO enrollments (user_id, course_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(course_id)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_enrolled(&self, user_id: i64, course_id: i64) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM enrollments WHERE user_id = ? AND course_id = ?")
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn list_enrolled(&self, user_id: i64) -> Result<Vec<Course>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT c.* FROM courses c
               JOIN enrollments e ON e.course_id = c.id
               WHERE e.user_id = ?
               ORDER BY e.joined_at ASC, c.id ASC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(course_from_row).collect()
    }

    async fn count_courses(&self) -> Result<u64, RepositoryError> {
        count_scalar(&self.pool, "SELECT COUNT(*) as cnt FROM courses").await
    }

    async fn count_enrollments(&self) -> Result<u64, RepositoryError> {
        count_scalar(&self.pool, "SELECT COUNT(*) as cnt FROM enrollments").await
    }

    async fn total_revenue_cents(&self) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT COALESCE(SUM(c.price_cents), 0) as total
               FROM courses c JOIN enrollments e ON e.course_id = c.id"#,
        )
        .fetch_one(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.try_get("total")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }
}
