//! Integration tests for CLO attainment and the PLO/PEO rollups over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, faculty_token, get_auth, post_json, seed_active_config, seed_clo,
    seed_course, seed_peo, seed_plo, seed_student, student_token,
};
use serde_json::json;
use sqlx::PgPool;

/// Ids created by [`seed_program`].
struct Program {
    student: i64,
    course: i64,
    plo1: i64,
    plo2: i64,
    clo1: i64,
    clo2: i64,
}

/// One course with two CLOs.
///
/// CLO1 (max 20) maps strongly to PLO1. CLO2 (max 10) maps strongly to
/// PLO2 and moderately to PLO1.
async fn seed_program(pool: &PgPool) -> Program {
    let student = seed_student(pool, "2021-CS-001", "2021").await;
    let course = seed_course(pool, "CS-101").await;
    let plo1 = seed_plo(pool, "PLO1").await;
    let plo2 = seed_plo(pool, "PLO2").await;
    let clo1 = seed_clo(pool, course, "CLO1", 20.0, plo1).await;
    let clo2 = seed_clo(pool, course, "CLO2", 10.0, plo2).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/mappings/clo-plo",
        &faculty_token(),
        json!({ "clo_id": clo2, "plo_id": plo1, "strength": "moderate" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    Program {
        student,
        course,
        plo1,
        plo2,
        clo1,
        clo2,
    }
}

async fn record(
    pool: &PgPool,
    student_id: i64,
    course_id: i64,
    components: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/assessments",
        &faculty_token(),
        json!({
            "student_id": student_id,
            "course_id": course_id,
            "exam_type": "final",
            "components": components,
        }),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

/// 18/20 on CLO1 and 5/10 on CLO2.
async fn record_sample(pool: &PgPool, p: &Program) {
    let (status, _) = record(
        pool,
        p.student,
        p.course,
        json!([
            { "component": "midterm", "clo_id": p.clo1, "obtained": 18.0, "out_of": 20.0 },
            { "component": "quiz", "clo_id": p.clo2, "obtained": 5.0, "out_of": 10.0 }
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn outcome<'a>(report: &'a serde_json::Value, id: i64) -> &'a serde_json::Value {
    report["data"]["outcomes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["outcome_id"] == id)
        .unwrap()
}

fn assert_close(value: &serde_json::Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recorded_assessment_rolls_up_to_plo(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/attainment/plos", &faculty_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;

    let plo1 = outcome(&report, p.plo1);
    assert_eq!(plo1["code"], "PLO1");
    assert_eq!(plo1["status"], "attained");
    assert_close(&plo1["percent"], 74.0);
    assert_eq!(plo1["contributions"], 2);

    let plo2 = outcome(&report, p.plo2);
    assert_close(&plo2["percent"], 50.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn recording_returns_recomputed_totals_and_attainments(pool: PgPool) {
    let p = seed_program(&pool).await;
    let (status, json) = record(
        &pool,
        p.student,
        p.course,
        json!([
            { "component": "midterm", "clo_id": p.clo1, "obtained": 18.0, "out_of": 20.0 },
            { "component": "cep", "clo_id": null, "obtained": 7.0, "out_of": 10.0 }
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_close(&json["data"]["obtained_marks"], 25.0);
    assert_close(&json["data"]["total_marks"], 30.0);
    assert_eq!(json["data"]["components"].as_array().unwrap().len(), 2);

    let attainments = json["data"]["attainments"].as_array().unwrap();
    assert_eq!(attainments.len(), 2);
    let clo2 = attainments.iter().find(|a| a["clo_id"] == p.clo2).unwrap();
    assert_close(&clo2["obtained"], 0.0);
    assert_close(&clo2["total"], 10.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn single_plo_without_mappings_is_no_data(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    let orphan = seed_plo(&pool, "PLO9").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/attainment/plos/{orphan}"), &faculty_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NO_DATA");

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/attainment/plos/{}", p.plo1), &faculty_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_close(&json["data"]["percent"], 74.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unmapped_plo_listed_as_no_data(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    let orphan = seed_plo(&pool, "PLO9").await;

    let app = common::build_test_app(pool);
    let report = body_json(get_auth(app, "/api/v1/attainment/plos", &faculty_token()).await).await;

    assert_eq!(outcome(&report, orphan)["status"], "no_data");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn batch_scope_filters_students(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;

    let other = seed_student(&pool, "2022-CS-001", "2022").await;
    let (status, _) = record(
        &pool,
        other,
        p.course,
        json!([{ "component": "midterm", "clo_id": p.clo2, "obtained": 10.0, "out_of": 10.0 }]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let report = body_json(
        get_auth(app, "/api/v1/attainment/plos?batch=2021", &faculty_token()).await,
    )
    .await;
    assert_eq!(report["data"]["scope"]["batch"], "2021");
    assert_close(&outcome(&report, p.plo2)["percent"], 50.0);

    let app = common::build_test_app(pool.clone());
    let report = body_json(get_auth(app, "/api/v1/attainment/plos", &faculty_token()).await).await;
    assert_close(&outcome(&report, p.plo2)["percent"], 75.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plo_rollup_feeds_peo(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    let peo = seed_peo(&pool, "PEO1").await;
    let unmapped_peo = seed_peo(&pool, "PEO2").await;

    for (plo_id, strength) in [(p.plo1, "strong"), (p.plo2, "strong")] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(
            app,
            "/api/v1/mappings/plo-peo",
            &admin_token(),
            json!({ "plo_id": plo_id, "peo_id": peo, "strength": strength }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool);
    let report = body_json(get_auth(app, "/api/v1/attainment/peos", &faculty_token()).await).await;

    assert_close(&outcome(&report, peo)["percent"], 62.0);
    assert_eq!(outcome(&report, unmapped_peo)["status"], "no_data");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_sees_own_clo_attainment(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;

    let app = common::build_test_app(pool);
    let uri = format!(
        "/api/v1/students/{}/courses/{}/clo-attainment",
        p.student, p.course
    );
    let response = get_auth(app, &uri, &student_token(p.student)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let clos = json["data"]["clos"].as_array().unwrap();
    assert_eq!(clos.len(), 2);
    assert_eq!(clos[0]["clo_code"], "CLO1");
    assert_close(&clos[0]["percent"], 90.0);
    assert_close(&clos[1]["percent"], 50.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_cannot_read_another_students_data(pool: PgPool) {
    let p = seed_program(&pool).await;
    let intruder = seed_student(&pool, "2021-CS-002", "2021").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/students/{}/report", p.student),
        &student_token(intruder),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/attainment/plos?student_id={}", p.student),
        &student_token(intruder),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_rollup_is_scoped_to_self(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    let other = seed_student(&pool, "2021-CS-002", "2021").await;

    let app = common::build_test_app(pool);
    let report = body_json(
        get_auth(app, "/api/v1/attainment/plos", &student_token(other)).await,
    )
    .await;

    assert_eq!(report["data"]["scope"]["student_id"], other);
    assert_eq!(outcome(&report, p.plo1)["status"], "no_data");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_grades_each_course(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    seed_active_config(common::build_test_app(pool.clone())).await;

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/students/{}/report", p.student),
        &student_token(p.student),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let courses = json["data"]["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    let course = &courses[0];
    assert_eq!(course["course_id"], p.course);
    assert_eq!(course["status"], "ok");
    // (18 + 5) / (20 + 10)
    assert_close(&course["value"], 23.0 / 30.0 * 100.0);
    assert_eq!(course["grade"], "C");
    assert_eq!(course["passed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_without_active_config_tags_error(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(
            app,
            &format!("/api/v1/students/{}/report", p.student),
            &faculty_token(),
        )
        .await,
    )
    .await;

    let course = &json["data"]["courses"][0];
    assert_eq!(course["status"], "error");
    assert_eq!(course["code"], "CONFIG_MISSING");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn course_batch_lists_every_assessed_student(pool: PgPool) {
    let p = seed_program(&pool).await;
    record_sample(&pool, &p).await;
    let second = seed_student(&pool, "2021-CS-002", "2021").await;
    let (status, _) = record(
        &pool,
        second,
        p.course,
        json!([{ "component": "final", "clo_id": p.clo1, "obtained": 10.0, "out_of": 20.0 }]),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/courses/{}/clo-attainment", p.course);
    let response = get_auth(app, &uri, &faculty_token()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let entries = json["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["status"] == "ok"));

    let second_entry = entries.iter().find(|e| e["student_id"] == second).unwrap();
    assert_close(&second_entry["clos"][0]["percent"], 50.0);
    assert_close(&second_entry["clos"][1]["percent"], 0.0);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &student_token(p.student)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
