//! CourseRepository trait definition.
//!
//! Covers the catalog, per-course content, enrollment, and the
//! aggregate counts behind the owner dashboard.

use studyhall_types::course::{Course, CourseContent, NewCourse, NewCourseContent};
use studyhall_types::error::RepositoryError;

/// Repository trait for courses, content, and enrollments.
pub trait CourseRepository: Send + Sync {
    /// Create a course in the catalog.
    fn create_course(
        &self,
        course: &NewCourse,
    ) -> impl std::future::Future<Output = Result<Course, RepositoryError>> + Send;

    /// Get a course by id.
    fn get_course(
        &self,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Course>, RepositoryError>> + Send;

    /// List the full catalog.
    fn list_courses(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Course>, RepositoryError>> + Send;

    /// Attach a content item to a course.
    fn add_content(
        &self,
        course_id: i64,
        content: &NewCourseContent,
    ) -> impl std::future::Future<Output = Result<CourseContent, RepositoryError>> + Send;

    /// List a course's content items in insertion order.
    fn list_content(
        &self,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<CourseContent>, RepositoryError>> + Send;

    /// Enroll a user. Enrolling twice is a no-op; returns whether a new
    /// enrollment row was created.
    fn enroll(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Whether the user is enrolled in the course.
    fn is_enrolled(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Courses the user is enrolled in.
    fn list_enrolled(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Course>, RepositoryError>> + Send;

    /// Count all courses (dashboard stat).
    fn count_courses(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count all enrollments (dashboard stat).
    fn count_enrollments(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Sum of the price of every enrolled course, in cents.
    fn total_revenue_cents(
        &self,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
