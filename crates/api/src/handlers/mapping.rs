//! Handlers for CLO->PLO and PLO->PEO mappings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use uniportal_core::error::CoreError;
use uniportal_core::types::DbId;
use uniportal_db::models::mapping::{CreateCloPloMapping, CreatePloPeoMapping};
use uniportal_db::repositories::{
    CloPloMappingRepo, CloRepo, PeoRepo, PloPeoMappingRepo, PloRepo,
};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireFaculty};
use crate::query::CourseFilterParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

// ---------------------------------------------------------------------------
// CLO -> PLO
// ---------------------------------------------------------------------------

/// List CLO->PLO mappings, optionally only those of one course.
pub async fn list_clo_plo(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<CourseFilterParams>,
) -> AppResult<impl IntoResponse> {
    let mappings = match params.course_id {
        Some(course_id) => CloPloMappingRepo::list_by_course(&state.pool, course_id).await?,
        None => CloPloMappingRepo::list(&state.pool).await?,
    };
    Ok(Json(DataResponse { data: mappings }))
}

pub async fn create_clo_plo(
    State(state): State<AppState>,
    RequireFaculty(user): RequireFaculty,
    Json(input): Json<CreateCloPloMapping>,
) -> AppResult<impl IntoResponse> {
    CloRepo::find_by_id(&state.pool, input.clo_id)
        .await?
        .ok_or_else(|| not_found("Clo", input.clo_id))?;
    PloRepo::find_by_id(&state.pool, input.plo_id)
        .await?
        .ok_or_else(|| not_found("Plo", input.plo_id))?;

    let mapping = CloPloMappingRepo::create(&state.pool, &input).await?;

    tracing::info!(
        mapping_id = mapping.id,
        clo_id = mapping.clo_id,
        plo_id = mapping.plo_id,
        strength = %mapping.strength,
        user_id = user.user_id,
        "CLO->PLO mapping created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: mapping })))
}

pub async fn delete_clo_plo(
    State(state): State<AppState>,
    RequireFaculty(user): RequireFaculty,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CloPloMappingRepo::delete(&state.pool, id).await? {
        tracing::info!(mapping_id = id, user_id = user.user_id, "CLO->PLO mapping deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("CloPloMapping", id))
    }
}

// ---------------------------------------------------------------------------
// PLO -> PEO
// ---------------------------------------------------------------------------

pub async fn list_plo_peo(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let mappings = PloPeoMappingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: mappings }))
}

pub async fn create_plo_peo(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreatePloPeoMapping>,
) -> AppResult<impl IntoResponse> {
    PloRepo::find_by_id(&state.pool, input.plo_id)
        .await?
        .ok_or_else(|| not_found("Plo", input.plo_id))?;
    PeoRepo::find_by_id(&state.pool, input.peo_id)
        .await?
        .ok_or_else(|| not_found("Peo", input.peo_id))?;

    let mapping = PloPeoMappingRepo::create(&state.pool, &input).await?;

    tracing::info!(
        mapping_id = mapping.id,
        plo_id = mapping.plo_id,
        peo_id = mapping.peo_id,
        strength = %mapping.strength,
        user_id = admin.user_id,
        "PLO->PEO mapping created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: mapping })))
}

pub async fn delete_plo_peo(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PloPeoMappingRepo::delete(&state.pool, id).await? {
        tracing::info!(mapping_id = id, user_id = admin.user_id, "PLO->PEO mapping deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("PloPeoMapping", id))
    }
}
