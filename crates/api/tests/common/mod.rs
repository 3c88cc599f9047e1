#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use uniportal_api::auth::jwt::{generate_access_token, JwtConfig};
use uniportal_api::config::ServerConfig;
use uniportal_api::routes;
use uniportal_api::state::AppState;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        jwt: test_jwt_config(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

pub fn token(sub: i64, role: &str) -> String {
    generate_access_token(sub, role, &test_jwt_config()).unwrap()
}

pub fn admin_token() -> String {
    token(1, "admin")
}

pub fn faculty_token() -> String {
    token(2, "faculty")
}

pub fn student_token(student_id: i64) -> String {
    token(student_id, "student")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(request(Method::GET, uri, None, None))
        .await
        .unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(request(Method::GET, uri, Some(token), None))
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    app.oneshot(request(Method::POST, uri, Some(token), Some(body)))
        .await
        .unwrap()
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(request(Method::POST, uri, Some(token), None))
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(request(Method::DELETE, uri, Some(token), None))
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Seed data
// ---------------------------------------------------------------------------

pub async fn seed_student(pool: &PgPool, registration_no: &str, batch: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO students (registration_no, name, batch, program)
         VALUES ($1, $1, $2, 'BSCS') RETURNING id",
    )
    .bind(registration_no)
    .bind(batch)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_course(pool: &PgPool, code: &str) -> i64 {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO courses (code, title, credit_hours, semester)
         VALUES ($1, $1, 3, 1) RETURNING id",
    )
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap();
    id
}

pub async fn seed_peo(pool: &PgPool, code: &str) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO peos (peo_code, title) VALUES ($1, $1) RETURNING id")
            .bind(code)
            .fetch_one(pool)
            .await
            .unwrap();
    id
}

pub async fn seed_plo(pool: &PgPool, code: &str) -> i64 {
    let (id,): (i64,) =
        sqlx::query_as("INSERT INTO plos (plo_code, title) VALUES ($1, $1) RETURNING id")
            .bind(code)
            .fetch_one(pool)
            .await
            .unwrap();
    id
}

/// Insert a CLO through the repository so its primary mapping is created.
pub async fn seed_clo(pool: &PgPool, course_id: i64, code: &str, max_marks: f64, plo_id: i64) -> i64 {
    uniportal_db::repositories::CloRepo::create(
        pool,
        &uniportal_db::models::outcome::CreateClo {
            course_id,
            clo_code: code.to_string(),
            description: None,
            max_marks,
            plo_id,
        },
    )
    .await
    .unwrap()
    .id
}

/// Create and activate the default A/B/C/D/F scale.
pub async fn seed_active_config(app: Router) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/v1/obe-configs",
        &admin_token(),
        serde_json::json!({
            "name": "Default",
            "thresholds": [
                { "grade": "A", "min_percent": 90.0 },
                { "grade": "B", "min_percent": 80.0 },
                { "grade": "C", "min_percent": 70.0 },
                { "grade": "D", "min_percent": 60.0 }
            ],
            "activate": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
