//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods ending in `_tx`
//! take an open transaction instead so handlers can group several writes.

pub mod assessment_repo;
pub mod attainment_repo;
pub mod clo_plo_mapping_repo;
pub mod clo_repo;
pub mod course_repo;
pub mod marks_repo;
pub mod obe_config_repo;
pub mod peo_repo;
pub mod plo_peo_mapping_repo;
pub mod plo_repo;
pub mod student_repo;

pub use assessment_repo::AssessmentRepo;
pub use attainment_repo::AttainmentRepo;
pub use clo_plo_mapping_repo::CloPloMappingRepo;
pub use clo_repo::CloRepo;
pub use course_repo::{CourseDeletion, CourseRepo};
pub use marks_repo::MarksRepo;
pub use obe_config_repo::ObeConfigRepo;
pub use peo_repo::PeoRepo;
pub use plo_peo_mapping_repo::PloPeoMappingRepo;
pub use plo_repo::PloRepo;
pub use student_repo::StudentRepo;
