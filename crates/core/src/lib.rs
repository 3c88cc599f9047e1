//! Domain types and pure computations for the OBE attainment service.
//!
//! Nothing in this crate touches the database or the network. Handlers fetch
//! rows through `uniportal_db`, hand them to the functions here, and persist
//! whatever comes back.

pub mod attainment;
pub mod error;
pub mod grading;
pub mod marks;
pub mod outcome;
pub mod roles;
pub mod rollup;
pub mod types;
