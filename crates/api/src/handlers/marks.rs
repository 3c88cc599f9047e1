//! Handlers for the theory/lab gradebook.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use uniportal_core::error::CoreError;
use uniportal_core::marks::{self, recompute_theory_lab};
use uniportal_core::types::DbId;
use uniportal_db::models::marks::RecordMarks;
use uniportal_db::repositories::{MarksRepo, ObeConfigRepo};

use super::assessment::{ensure_course_exists, ensure_student_exists};
use super::obe_config::{classify_value, Classification};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_student_access, RequireAuth, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

/// Classification of one marks row under the active configuration.
#[derive(Debug, Serialize)]
pub struct MarksGrade {
    pub marks_id: DbId,
    #[serde(flatten)]
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// POST /marks
// ---------------------------------------------------------------------------

/// Record (insert or replace) theory/lab marks.
///
/// `obtained_marks` and `total_marks` are recomputed from the parts.
pub async fn record_marks(
    State(state): State<AppState>,
    RequireFaculty(user): RequireFaculty,
    Json(input): Json<RecordMarks>,
) -> AppResult<impl IntoResponse> {
    marks::validate_exam_type(&input.exam_type)?;
    ensure_student_exists(&state.pool, input.student_id).await?;
    ensure_course_exists(&state.pool, input.course_id).await?;

    let totals = recompute_theory_lab(&input.parts())?;
    let row = MarksRepo::upsert(&state.pool, &input, totals).await?;

    tracing::info!(
        marks_id = row.id,
        student_id = row.student_id,
        course_id = row.course_id,
        exam_type = %row.exam_type,
        user_id = user.user_id,
        "Marks recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}

// ---------------------------------------------------------------------------
// GET /marks/{id}/grade
// ---------------------------------------------------------------------------

pub async fn grade_marks(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = MarksRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Marks",
            id,
        }))?;
    ensure_student_access(&user, row.student_id)?;

    let percentage = row.totals().percentage()?;
    let active = ObeConfigRepo::find_active(&state.pool).await?;
    let classification = classify_value(percentage, active.as_ref())?;

    Ok(Json(DataResponse {
        data: MarksGrade {
            marks_id: row.id,
            classification,
        },
    }))
}
