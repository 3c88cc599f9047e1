//! Route definitions for attainment rollups and classification.
//!
//! ```text
//! ATTAINMENT (mounted at /attainment):
//! GET  /plos            plo_attainment (?course_id, ?batch, ?student_id)
//! GET  /plos/{plo_id}   single_plo_attainment
//! GET  /peos            peo_attainment (?course_id, ?batch, ?student_id)
//! POST /classify        classify
//!
//! COURSE-SCOPED (mounted at /courses):
//! GET  /{course_id}/clo-attainment   course_clo_attainment
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{attainment, obe_config};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plos", get(attainment::plo_attainment))
        .route("/plos/{plo_id}", get(attainment::single_plo_attainment))
        .route("/peos", get(attainment::peo_attainment))
        .route("/classify", post(obe_config::classify))
}

pub fn course_router() -> Router<AppState> {
    Router::new().route(
        "/{course_id}/clo-attainment",
        get(attainment::course_clo_attainment),
    )
}
