//! Handlers for CLO attainment and the PLO/PEO rollups.
//!
//! Batch views (a course's students, a student's courses) carry attainment
//! errors per item as `{ "status": "error", "code", "error" }` so one bad
//! record does not fail the whole response.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use uniportal_core::attainment::{
    attainment_percent, compute_batch, compute_clo_attainment, validate_component_score,
    CloAttainment, ComponentScore, StudentScores,
};
use uniportal_core::error::{CoreError, ObeError};
use uniportal_core::rollup::{rollup_to_peo, rollup_to_plo, RollupValue, SourceAttainment};
use uniportal_core::types::DbId;
use uniportal_db::models::attainment::{Attainment, AttainmentScope};
use uniportal_db::models::mapping::{CloPloMapping, PloPeoMapping};
use uniportal_db::models::obe_config::ObeConfig;
use uniportal_db::models::outcome::Clo;
use uniportal_db::repositories::{
    AssessmentRepo, AttainmentRepo, CloPloMappingRepo, CloRepo, ObeConfigRepo, PeoRepo,
    PloPeoMappingRepo, PloRepo,
};

use super::assessment::{ensure_course_exists, ensure_student_exists};
use super::obe_config::{classify_value, Classification};
use crate::error::{classify_obe_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{ensure_student_access, RequireAuth, RequireFaculty};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Attainment of one CLO, labelled with its code.
#[derive(Debug, Serialize)]
pub struct CloAttainmentEntry {
    pub clo_id: DbId,
    pub clo_code: String,
    #[serde(flatten)]
    pub attainment: CloAttainment,
}

#[derive(Debug, Serialize)]
pub struct StudentCloAttainment {
    pub student_id: DbId,
    pub course_id: DbId,
    pub clos: Vec<CloAttainmentEntry>,
}

/// A per-item result: either the value or the attainment error it hit.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Tagged<T: Serialize> {
    Ok {
        #[serde(flatten)]
        value: T,
    },
    Error {
        code: &'static str,
        error: String,
    },
}

impl<T: Serialize> From<Result<T, ObeError>> for Tagged<T> {
    fn from(result: Result<T, ObeError>) -> Self {
        match result {
            Ok(value) => Tagged::Ok { value },
            Err(err) => {
                let (_, code, error) = classify_obe_error(&err);
                Tagged::Error { code, error }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CloSet {
    pub clos: Vec<CloAttainmentEntry>,
}

#[derive(Debug, Serialize)]
pub struct StudentBatchEntry {
    pub student_id: DbId,
    #[serde(flatten)]
    pub result: Tagged<CloSet>,
}

/// One course in a student's report.
#[derive(Debug, Serialize)]
pub struct CourseSummary {
    pub clos: Vec<CloPercent>,
    #[serde(flatten)]
    pub classification: Classification,
}

#[derive(Debug, Serialize)]
pub struct CloPercent {
    pub clo_id: DbId,
    pub percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CourseReportEntry {
    pub course_id: DbId,
    #[serde(flatten)]
    pub result: Tagged<CourseSummary>,
}

#[derive(Debug, Serialize)]
pub struct StudentReport {
    pub student_id: DbId,
    pub courses: Vec<CourseReportEntry>,
}

/// Rolled-up attainment of one PLO or PEO.
#[derive(Debug, Serialize)]
pub struct OutcomeRollupEntry {
    pub outcome_id: DbId,
    pub code: String,
    #[serde(flatten)]
    pub value: RollupValue,
}

#[derive(Debug, Serialize)]
pub struct RollupReport {
    pub scope: AttainmentScope,
    pub outcomes: Vec<OutcomeRollupEntry>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn label_clos(
    attainments: &BTreeMap<DbId, CloAttainment>,
    clos: &[Clo],
) -> Vec<CloAttainmentEntry> {
    clos.iter()
        .filter_map(|clo| {
            attainments.get(&clo.id).map(|a| CloAttainmentEntry {
                clo_id: clo.id,
                clo_code: clo.clo_code.clone(),
                attainment: *a,
            })
        })
        .collect()
}

/// Students may only roll up their own records.
fn resolve_scope(user: &AuthUser, mut scope: AttainmentScope) -> AppResult<AttainmentScope> {
    if user.is_student() {
        match scope.student_id {
            Some(id) => ensure_student_access(user, id)?,
            None => scope.student_id = Some(user.user_id),
        }
    }
    Ok(scope)
}

/// One observation per stored row. Rows with zero total carry no
/// attainment and are skipped.
fn observations(rows: &[Attainment]) -> Vec<SourceAttainment> {
    let sources: Vec<_> = rows
        .iter()
        .filter_map(|row| {
            row.percent().ok().map(|percent| SourceAttainment {
                outcome_id: row.clo_id,
                percent,
            })
        })
        .collect();
    if sources.len() < rows.len() {
        tracing::debug!(
            skipped = rows.len() - sources.len(),
            "Skipped attainment rows without a defined percentage"
        );
    }
    sources
}

/// Roll the scope's attainment rows up into every PLO.
async fn plo_rollup(
    pool: &sqlx::PgPool,
    scope: &AttainmentScope,
) -> AppResult<BTreeMap<DbId, RollupValue>> {
    let rows = AttainmentRepo::list_in_scope(pool, scope).await?;
    let links = CloPloMappingRepo::list(pool)
        .await?
        .iter()
        .map(CloPloMapping::link)
        .collect::<Result<Vec<_>, CoreError>>()?;
    let plo_ids: Vec<DbId> = PloRepo::list(pool).await?.iter().map(|p| p.id).collect();

    Ok(rollup_to_plo(&observations(&rows), &links, &plo_ids))
}

fn label_outcomes(
    values: BTreeMap<DbId, RollupValue>,
    codes: &BTreeMap<DbId, String>,
) -> Vec<OutcomeRollupEntry> {
    values
        .into_iter()
        .map(|(outcome_id, value)| OutcomeRollupEntry {
            outcome_id,
            code: codes.get(&outcome_id).cloned().unwrap_or_default(),
            value,
        })
        .collect()
}

/// Course percentage is total obtained over total maximum across its CLOs.
fn summarize_course(
    rows: &[&Attainment],
    active: Option<&ObeConfig>,
) -> Result<CourseSummary, ObeError> {
    let obtained: f64 = rows.iter().map(|r| r.obtained).sum();
    let total: f64 = rows.iter().map(|r| r.total).sum();
    let percentage = attainment_percent(obtained, total)?;
    Ok(CourseSummary {
        clos: rows
            .iter()
            .map(|r| CloPercent {
                clo_id: r.clo_id,
                percent: r.percent().ok(),
            })
            .collect(),
        classification: classify_value(percentage, active)?,
    })
}

// ---------------------------------------------------------------------------
// GET /students/{student_id}/courses/{course_id}/clo-attainment
// ---------------------------------------------------------------------------

/// CLO attainment computed from the student's raw component scores.
pub async fn student_clo_attainment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((student_id, course_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_student_access(&user, student_id)?;
    ensure_student_exists(&state.pool, student_id).await?;
    ensure_course_exists(&state.pool, course_id).await?;

    let clos = CloRepo::list_by_course(&state.pool, course_id).await?;
    let scores: Vec<ComponentScore> =
        AssessmentRepo::components_for_student_course(&state.pool, student_id, course_id)
            .await?
            .iter()
            .map(|c| c.score())
            .collect();
    scores.iter().try_for_each(validate_component_score)?;

    let definitions: Vec<_> = clos.iter().map(Clo::definition).collect();
    let attainments = compute_clo_attainment(&scores, &definitions);

    Ok(Json(DataResponse {
        data: StudentCloAttainment {
            student_id,
            course_id,
            clos: label_clos(&attainments, &clos),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /courses/{course_id}/clo-attainment
// ---------------------------------------------------------------------------

/// CLO attainment of every assessed student in a course.
pub async fn course_clo_attainment(
    State(state): State<AppState>,
    RequireFaculty(_user): RequireFaculty,
    Path(course_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_course_exists(&state.pool, course_id).await?;

    let clos = CloRepo::list_by_course(&state.pool, course_id).await?;
    let mut by_student: BTreeMap<DbId, Vec<ComponentScore>> = BTreeMap::new();
    for row in AssessmentRepo::components_for_course(&state.pool, course_id).await? {
        by_student
            .entry(row.student_id)
            .or_default()
            .push(row.component.score());
    }
    let students: Vec<StudentScores> = by_student
        .into_iter()
        .map(|(student_id, scores)| StudentScores { student_id, scores })
        .collect();

    let definitions: Vec<_> = clos.iter().map(Clo::definition).collect();
    let entries: Vec<StudentBatchEntry> = compute_batch(&students, &definitions)
        .into_iter()
        .map(|s| StudentBatchEntry {
            student_id: s.student_id,
            result: s
                .result
                .map(|attainments| CloSet {
                    clos: label_clos(&attainments, &clos),
                })
                .into(),
        })
        .collect();

    tracing::debug!(course_id, students = entries.len(), "Computed course CLO attainment");

    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// GET /students/{student_id}/report
// ---------------------------------------------------------------------------

/// Per-course attainment and grade for one student.
pub async fn student_report(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(student_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_student_access(&user, student_id)?;
    ensure_student_exists(&state.pool, student_id).await?;

    let scope = AttainmentScope {
        student_id: Some(student_id),
        ..AttainmentScope::default()
    };
    let rows = AttainmentRepo::list_in_scope(&state.pool, &scope).await?;
    let active = ObeConfigRepo::find_active(&state.pool).await?;

    let mut by_course: BTreeMap<DbId, Vec<&Attainment>> = BTreeMap::new();
    for row in &rows {
        by_course.entry(row.course_id).or_default().push(row);
    }

    let courses = by_course
        .into_iter()
        .map(|(course_id, course_rows)| CourseReportEntry {
            course_id,
            result: summarize_course(&course_rows, active.as_ref()).into(),
        })
        .collect();

    Ok(Json(DataResponse {
        data: StudentReport {
            student_id,
            courses,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /attainment/plos
// ---------------------------------------------------------------------------

/// Weighted CLO->PLO rollup over the attainment rows in scope.
pub async fn plo_attainment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(scope): Query<AttainmentScope>,
) -> AppResult<impl IntoResponse> {
    let scope = resolve_scope(&user, scope)?;
    let values = plo_rollup(&state.pool, &scope).await?;
    let codes: BTreeMap<DbId, String> = PloRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|p| (p.id, p.plo_code))
        .collect();

    Ok(Json(DataResponse {
        data: RollupReport {
            scope,
            outcomes: label_outcomes(values, &codes),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /attainment/plos/{plo_id}
// ---------------------------------------------------------------------------

/// Rolled-up attainment of one PLO. 404 `NO_DATA` when nothing in scope
/// maps to it.
pub async fn single_plo_attainment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(plo_id): Path<DbId>,
    Query(scope): Query<AttainmentScope>,
) -> AppResult<impl IntoResponse> {
    let scope = resolve_scope(&user, scope)?;
    let plo = PloRepo::find_by_id(&state.pool, plo_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Plo",
            id: plo_id,
        }))?;

    let values = plo_rollup(&state.pool, &scope).await?;
    let value = values.get(&plo_id).copied().unwrap_or(RollupValue::NoData);
    value.require()?;

    Ok(Json(DataResponse {
        data: OutcomeRollupEntry {
            outcome_id: plo.id,
            code: plo.plo_code,
            value,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /attainment/peos
// ---------------------------------------------------------------------------

/// CLO->PLO rollup followed by the weighted PLO->PEO rollup.
pub async fn peo_attainment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(scope): Query<AttainmentScope>,
) -> AppResult<impl IntoResponse> {
    let scope = resolve_scope(&user, scope)?;
    let plo_values = plo_rollup(&state.pool, &scope).await?;

    let links = PloPeoMappingRepo::list(&state.pool)
        .await?
        .iter()
        .map(PloPeoMapping::link)
        .collect::<Result<Vec<_>, CoreError>>()?;
    let peos = PeoRepo::list(&state.pool).await?;
    let peo_ids: Vec<DbId> = peos.iter().map(|p| p.id).collect();
    let codes: BTreeMap<DbId, String> = peos.into_iter().map(|p| (p.id, p.peo_code)).collect();

    let values = rollup_to_peo(&plo_values, &links, &peo_ids);

    Ok(Json(DataResponse {
        data: RollupReport {
            scope,
            outcomes: label_outcomes(values, &codes),
        },
    }))
}
