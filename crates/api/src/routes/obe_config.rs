//! Route definitions for OBE configurations, mounted at `/obe-configs`.
//!
//! ```text
//! GET  /                 list_configs
//! POST /                 create_config
//! GET  /active           get_active_config
//! GET  /{id}             get_config
//! POST /{id}/activate    activate_config
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::obe_config;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(obe_config::list_configs).post(obe_config::create_config),
        )
        // `/active` must come before `/{id}` to avoid path conflict.
        .route("/active", get(obe_config::get_active_config))
        .route("/{id}", get(obe_config::get_config))
        .route("/{id}/activate", post(obe_config::activate_config))
}
