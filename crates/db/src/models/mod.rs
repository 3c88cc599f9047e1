//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts (`Deserialize` where it can come straight
//!   from a request body)

pub mod assessment;
pub mod attainment;
pub mod course;
pub mod mapping;
pub mod marks;
pub mod obe_config;
pub mod outcome;
pub mod student;
