//! Owner dashboard aggregation handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use studyhall_core::repository::course::CourseRepository;
use studyhall_core::repository::user::UserRepository;

use crate::http::error::AppError;
use crate::http::extractors::auth::RequireOwner;
use crate::state::AppState;

/// Aggregate platform totals for the owner dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_courses: u64,
    pub total_enrollments: u64,
    pub total_revenue_cents: i64,
}

/// GET /api/v1/analytics/dashboard - Platform totals (owner only).
pub async fn dashboard(
    State(state): State<AppState>,
    RequireOwner(_owner): RequireOwner,
) -> Result<Json<DashboardStats>, AppError> {
    let total_users = state.user_repo.count_users().await?;
    let total_courses = state.course_repo.count_courses().await?;
    let total_enrollments = state.course_repo.count_enrollments().await?;
    let total_revenue_cents = state.course_repo.total_revenue_cents().await?;

    Ok(Json(DashboardStats {
        total_users,
        total_courses,
        total_enrollments,
        total_revenue_cents,
    }))
}
