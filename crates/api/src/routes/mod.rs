pub mod assessment;
pub mod attainment;
pub mod health;
pub mod mapping;
pub mod obe_config;
pub mod student;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assessments                                         record (POST)
/// /assessments/{id}                                    get
///
/// /marks                                               record (POST)
/// /marks/{id}/grade                                    classify marks
///
/// /students/{student_id}/assessments                   list
/// /students/{student_id}/courses/{course_id}/clo-attainment
/// /students/{student_id}/report                        per-course report
///
/// /courses/{course_id}/clo-attainment                  whole course
///
/// /attainment/plos                                     CLO->PLO rollup
/// /attainment/plos/{plo_id}                            single PLO
/// /attainment/peos                                     PLO->PEO rollup
/// /attainment/classify                                 classify (POST)
///
/// /mappings/clo-plo                                    list, create
/// /mappings/clo-plo/{id}                               delete
/// /mappings/plo-peo                                    list, create
/// /mappings/plo-peo/{id}                               delete
///
/// /obe-configs                                         list, create
/// /obe-configs/active                                  active config
/// /obe-configs/{id}                                    get
/// /obe-configs/{id}/activate                           activate (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assessments", assessment::assessment_router())
        .nest("/marks", assessment::marks_router())
        .nest("/students", student::router())
        .nest("/courses", attainment::course_router())
        .nest("/attainment", attainment::router())
        .nest("/mappings", mapping::router())
        .nest("/obe-configs", obe_config::router())
}
