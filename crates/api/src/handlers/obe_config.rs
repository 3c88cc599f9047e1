//! Handlers for versioned OBE configurations and grade classification.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use uniportal_core::error::{CoreError, ObeError};
use uniportal_core::grading::{
    self, GradeScale, GradeThreshold, DEFAULT_FALLBACK_GRADE, DEFAULT_PASS_PERCENTAGE,
};
use uniportal_core::types::DbId;
use uniportal_db::models::obe_config::{CreateObeConfig, ObeConfig};
use uniportal_db::repositories::ObeConfigRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /obe-configs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateObeConfigRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub thresholds: Vec<GradeThreshold>,
    pub fallback_grade: Option<String>,
    pub pass_percentage: Option<f64>,
    /// Make the new version the active one in the same transaction.
    #[serde(default)]
    pub activate: bool,
}

/// Body of `POST /attainment/classify`.
#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(range(min = 0.0, max = 100.0))]
    pub value: f64,
}

/// A value classified under the active configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    pub value: f64,
    pub grade: String,
    pub passed: bool,
    pub config_version: Option<i32>,
}

/// Classify `value` under `active`, failing with
/// [`ObeError::ConfigMissing`] when there is no active configuration.
pub(crate) fn classify_value(
    value: f64,
    active: Option<&ObeConfig>,
) -> Result<Classification, ObeError> {
    let scale = active.map(ObeConfig::scale);
    let grade = grading::classify(value, scale.as_ref())?.to_string();
    Ok(Classification {
        value,
        grade,
        passed: scale.as_ref().is_some_and(|s| s.is_passing(value)),
        config_version: active.map(|c| c.version),
    })
}

// ---------------------------------------------------------------------------
// GET /obe-configs
// ---------------------------------------------------------------------------

pub async fn list_configs(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let configs = ObeConfigRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: configs }))
}

// ---------------------------------------------------------------------------
// POST /obe-configs
// ---------------------------------------------------------------------------

/// Store a new configuration version, optionally activating it.
pub async fn create_config(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<CreateObeConfigRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;

    let scale = GradeScale {
        thresholds: body.thresholds,
        fallback_grade: body
            .fallback_grade
            .unwrap_or_else(|| DEFAULT_FALLBACK_GRADE.to_string()),
        pass_percentage: body.pass_percentage.unwrap_or(DEFAULT_PASS_PERCENTAGE),
    };
    grading::validate_scale(&scale)?;

    let input = CreateObeConfig {
        name: body.name,
        scale,
    };
    let config = ObeConfigRepo::create(&state.pool, &input, body.activate).await?;

    tracing::info!(
        config_id = config.id,
        version = config.version,
        is_active = config.is_active,
        user_id = admin.user_id,
        "OBE config created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: config })))
}

// ---------------------------------------------------------------------------
// GET /obe-configs/{id}
// ---------------------------------------------------------------------------

pub async fn get_config(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let config = ObeConfigRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ObeConfig",
            id,
        }))?;
    Ok(Json(DataResponse { data: config }))
}

// ---------------------------------------------------------------------------
// GET /obe-configs/active
// ---------------------------------------------------------------------------

pub async fn get_active_config(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let config = ObeConfigRepo::find_active(&state.pool)
        .await?
        .ok_or(ObeError::ConfigMissing)?;
    Ok(Json(DataResponse { data: config }))
}

// ---------------------------------------------------------------------------
// POST /obe-configs/{id}/activate
// ---------------------------------------------------------------------------

/// Make a configuration the single active one.
pub async fn activate_config(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let config = ObeConfigRepo::activate(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ObeConfig",
            id,
        }))?;

    tracing::info!(
        config_id = config.id,
        version = config.version,
        user_id = admin.user_id,
        "OBE config activated"
    );

    Ok(Json(DataResponse { data: config }))
}

// ---------------------------------------------------------------------------
// POST /attainment/classify
// ---------------------------------------------------------------------------

/// Classify an attainment percentage under the active configuration.
pub async fn classify(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<ClassifyRequest>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let active = ObeConfigRepo::find_active(&state.pool).await?;
    let classification = classify_value(body.value, active.as_ref())?;
    Ok(Json(DataResponse {
        data: classification,
    }))
}
