//! Student-scoped read routes, mounted at `/students`.
//!
//! ```text
//! GET /{student_id}/assessments                         list_student_assessments
//! GET /{student_id}/courses/{course_id}/clo-attainment  student_clo_attainment
//! GET /{student_id}/report                              student_report
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::{assessment, attainment};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{student_id}/assessments",
            get(assessment::list_student_assessments),
        )
        .route(
            "/{student_id}/courses/{course_id}/clo-attainment",
            get(attainment::student_clo_attainment),
        )
        .route("/{student_id}/report", get(attainment::student_report))
}
