//! Course catalog, purchase, and content handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

use studyhall_core::repository::course::CourseRepository;
use studyhall_types::course::{Course, CourseContent};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::state::AppState;

/// GET /api/v1/courses - The full catalog (no authentication required).
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.course_repo.list_courses().await?;
    Ok(Json(courses))
}

/// POST /api/v1/courses/{id}/buy - Enroll the caller in a course.
///
/// Buying an already-owned course is a no-op success. Payment itself is
/// out of scope; enrollment is recorded directly.
pub async fn buy_course(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let course = state
        .course_repo
        .get_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let newly_enrolled = state.course_repo.enroll(user.id, course_id).await?;

    if newly_enrolled {
        tracing::info!(user_id = user.id, course_id, "course purchased");
        Ok(Json(json!({
            "message": "Course purchased successfully",
            "course_title": course.title,
        })))
    } else {
        Ok(Json(json!({ "message": "Already enrolled" })))
    }
}

/// GET /api/v1/courses/my - Courses the caller is enrolled in.
pub async fn my_courses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.course_repo.list_enrolled(user.id).await?;
    Ok(Json(courses))
}

/// GET /api/v1/courses/{id}/content - Content items of a course.
///
/// Requires enrollment; admin and owner accounts may view without it.
pub async fn course_content(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(course_id): Path<i64>,
) -> Result<Json<Vec<CourseContent>>, AppError> {
    state
        .course_repo
        .get_course(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let enrolled = state.course_repo.is_enrolled(user.id, course_id).await?;
    if !enrolled && !user.role.is_admin() {
        return Err(AppError::Forbidden("Not enrolled in this course".to_string()));
    }

    let contents = state.course_repo.list_content(course_id).await?;
    Ok(Json(contents))
}
