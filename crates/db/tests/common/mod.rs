#![allow(dead_code)]

use sqlx::PgPool;
use uniportal_core::grading::GradeScale;
use uniportal_db::models::course::{Course, CreateCourse};
use uniportal_db::models::obe_config::{CreateObeConfig, ObeConfig};
use uniportal_db::models::outcome::{Clo, CreateClo, CreatePeo, CreatePlo, Peo, Plo};
use uniportal_db::models::student::{CreateStudent, Student};
use uniportal_db::repositories::{CloRepo, CourseRepo, ObeConfigRepo, PeoRepo, PloRepo, StudentRepo};

pub async fn seed_student(pool: &PgPool, registration_no: &str, batch: &str) -> Student {
    StudentRepo::create(
        pool,
        &CreateStudent {
            registration_no: registration_no.to_string(),
            name: format!("Student {registration_no}"),
            batch: batch.to_string(),
            program: "BSCS".to_string(),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_course(pool: &PgPool, code: &str) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            code: code.to_string(),
            title: format!("Course {code}"),
            credit_hours: 3,
            semester: 1,
            instructor: Some("Dr. Example".to_string()),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_peo(pool: &PgPool, code: &str) -> Peo {
    PeoRepo::create(
        pool,
        &CreatePeo {
            peo_code: code.to_string(),
            title: format!("Objective {code}"),
            description: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_plo(pool: &PgPool, code: &str) -> Plo {
    PloRepo::create(
        pool,
        &CreatePlo {
            plo_code: code.to_string(),
            title: format!("Outcome {code}"),
            description: None,
            peo_id: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_clo(
    pool: &PgPool,
    course_id: i64,
    code: &str,
    max_marks: f64,
    plo_id: i64,
) -> Clo {
    CloRepo::create(
        pool,
        &CreateClo {
            course_id,
            clo_code: code.to_string(),
            description: None,
            max_marks,
            plo_id,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_config(pool: &PgPool, name: &str, activate: bool) -> ObeConfig {
    ObeConfigRepo::create(
        pool,
        &CreateObeConfig {
            name: name.to_string(),
            scale: GradeScale::default(),
        },
        activate,
    )
    .await
    .unwrap()
}
