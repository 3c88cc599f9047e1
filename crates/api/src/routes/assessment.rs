//! Route definitions for assessments and theory/lab marks.
//!
//! ```text
//! POST /assessments                record_assessment
//! GET  /assessments/{id}           get_assessment
//!
//! POST /marks                      record_marks
//! GET  /marks/{id}/grade           grade_marks
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assessment, marks};
use crate::state::AppState;

/// Mounted at `/assessments`.
pub fn assessment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(assessment::record_assessment))
        .route("/{id}", get(assessment::get_assessment))
}

/// Mounted at `/marks`.
pub fn marks_router() -> Router<AppState> {
    Router::new()
        .route("/", post(marks::record_marks))
        .route("/{id}/grade", get(marks::grade_marks))
}
