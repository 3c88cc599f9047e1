//! Handlers for recording and reading assessments.
//!
//! Recording an assessment is the write boundary for CLO attainment: the
//! components are validated, the assessment totals are recomputed from them,
//! and the student's attainment rows for the course are refreshed, all in
//! one transaction.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use uniportal_core::attainment::{clo_marks, ComponentScore};
use uniportal_core::error::{CoreError, ObeError};
use uniportal_core::marks::{self, recompute_assessment};
use uniportal_core::types::DbId;
use uniportal_db::models::assessment::{AssessmentDetail, NewComponent, RecordAssessment};
use uniportal_db::models::attainment::Attainment;
use uniportal_db::models::outcome::Clo;
use uniportal_db::repositories::{
    AssessmentRepo, AttainmentRepo, CloRepo, CourseRepo, StudentRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_student_access, RequireAuth, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /assessments`. Totals are never accepted from the client.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordAssessmentRequest {
    pub student_id: DbId,
    pub course_id: DbId,
    #[validate(length(min = 1, max = 32))]
    pub exam_type: String,
    #[validate(length(min = 1, message = "at least one component is required"))]
    pub components: Vec<NewComponent>,
}

/// The stored assessment and the attainment rows it produced.
#[derive(Debug, Serialize)]
pub struct RecordedAssessment {
    #[serde(flatten)]
    pub assessment: AssessmentDetail,
    pub attainments: Vec<Attainment>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a student exists.
pub(crate) async fn ensure_student_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    if StudentRepo::exists(pool, id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))
    }
}

/// Verify that a course exists.
pub(crate) async fn ensure_course_exists(pool: &sqlx::PgPool, id: DbId) -> AppResult<()> {
    CourseRepo::find_by_id(pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id,
        }))
}

/// Reject components whose CLO belongs to another course.
fn check_component_clos(components: &[NewComponent], clos: &[Clo]) -> AppResult<()> {
    let course_clos: HashSet<DbId> = clos.iter().map(|c| c.id).collect();
    for component in components {
        marks::validate_component_name(&component.component)?;
        if let Some(clo_id) = component.clo_id {
            if !course_clos.contains(&clo_id) {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "CLO {clo_id} does not belong to this course"
                ))));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// POST /assessments
// ---------------------------------------------------------------------------

/// Record (insert or replace) an assessment and refresh attainment rows.
pub async fn record_assessment(
    State(state): State<AppState>,
    RequireFaculty(user): RequireFaculty,
    Json(body): Json<RecordAssessmentRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    marks::validate_exam_type(&body.exam_type)?;
    ensure_student_exists(&state.pool, body.student_id).await?;
    ensure_course_exists(&state.pool, body.course_id).await?;

    let scores: Vec<ComponentScore> = body.components.iter().map(NewComponent::score).collect();
    let totals = recompute_assessment(&scores)?;

    let key = RecordAssessment {
        student_id: body.student_id,
        course_id: body.course_id,
        exam_type: body.exam_type.clone(),
    };

    let mut tx = state.pool.begin().await?;

    // Serializes writers for this student; the component read below must
    // see every assessment committed before it.
    if !StudentRepo::lock_tx(&mut tx, key.student_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id: key.student_id,
        }));
    }

    let clos = CloRepo::list_by_course_tx(&mut tx, key.course_id).await?;
    check_component_clos(&body.components, &clos)?;

    let assessment = AssessmentRepo::upsert_tx(&mut tx, &key, totals).await?;
    let components =
        AssessmentRepo::replace_components_tx(&mut tx, assessment.id, &body.components).await?;

    // Attainment covers every assessment the student has in the course.
    let course_scores: Vec<ComponentScore> =
        AssessmentRepo::components_for_student_course_tx(&mut tx, key.student_id, key.course_id)
            .await?
            .iter()
            .map(|c| c.score())
            .collect();
    let definitions: Vec<_> = clos.iter().map(Clo::definition).collect();
    let per_clo = clo_marks(&course_scores, &definitions);

    if let Some(over) = per_clo.iter().find(|m| m.obtained > m.total) {
        // Dropping `tx` rolls the whole write back.
        return Err(ObeError::InconsistentInput(format!(
            "marks attributed to CLO {} ({}) exceed its maximum ({})",
            over.clo_id, over.obtained, over.total
        ))
        .into());
    }

    let attainments =
        AttainmentRepo::upsert_tx(&mut tx, key.student_id, key.course_id, &per_clo).await?;

    tx.commit().await?;

    tracing::info!(
        assessment_id = assessment.id,
        student_id = key.student_id,
        course_id = key.course_id,
        exam_type = %key.exam_type,
        components = components.len(),
        attainment_rows = attainments.len(),
        user_id = user.user_id,
        "Assessment recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordedAssessment {
                assessment: AssessmentDetail {
                    assessment,
                    components,
                },
                attainments,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /assessments/{id}
// ---------------------------------------------------------------------------

pub async fn get_assessment(
    State(state): State<AppState>,
    RequireFaculty(_user): RequireFaculty,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = AssessmentRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Assessment",
            id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// GET /students/{student_id}/assessments
// ---------------------------------------------------------------------------

pub async fn list_student_assessments(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(student_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_student_access(&user, student_id)?;
    ensure_student_exists(&state.pool, student_id).await?;

    let assessments = AssessmentRepo::list_by_student(&state.pool, student_id).await?;

    tracing::debug!(count = assessments.len(), student_id, "Listed assessments");

    Ok(Json(DataResponse { data: assessments }))
}
