//! Course management handlers (admin/owner only).

use axum::extract::{Path, State};
use axum::Json;

use studyhall_core::repository::course::CourseRepository;
use studyhall_types::course::{Course, CourseContent, NewCourse, NewCourseContent};

use crate::http::error::AppError;
use crate::http::extractors::auth::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/admin/courses - Create a course.
pub async fn create_course(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<NewCourse>,
) -> Result<Json<Course>, AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Course title must not be empty".to_string()));
    }
    if body.price_cents < 0 {
        return Err(AppError::Validation("Price must not be negative".to_string()));
    }

    let course = state.course_repo.create_course(&body).await?;
    tracing::info!(course_id = course.id, admin_id = admin.id, "course created");

    Ok(Json(course))
}

/// POST /api/v1/admin/courses/{id}/content - Attach content to a course.
pub async fn add_content(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(course_id): Path<i64>,
    Json(body): Json<NewCourseContent>,
) -> Result<Json<CourseContent>, AppError> {
    state
        .course_repo
        .get_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let content = state.course_repo.add_content(course_id, &body).await?;
    Ok(Json(content))
}
