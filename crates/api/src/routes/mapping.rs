//! Route definitions for outcome mappings, mounted at `/mappings`.
//!
//! ```text
//! GET    /clo-plo         list_clo_plo (?course_id)
//! POST   /clo-plo         create_clo_plo
//! DELETE /clo-plo/{id}    delete_clo_plo
//! GET    /plo-peo         list_plo_peo
//! POST   /plo-peo         create_plo_peo
//! DELETE /plo-peo/{id}    delete_plo_peo
//! ```

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::mapping;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/clo-plo",
            get(mapping::list_clo_plo).post(mapping::create_clo_plo),
        )
        .route("/clo-plo/{id}", delete(mapping::delete_clo_plo))
        .route(
            "/plo-peo",
            get(mapping::list_plo_peo).post(mapping::create_plo_peo),
        )
        .route("/plo-peo/{id}", delete(mapping::delete_plo_peo))
}
