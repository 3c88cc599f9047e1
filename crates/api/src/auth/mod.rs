//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Tokens are issued by the portal's identity service; this service only
//! verifies them. [`jwt::generate_access_token`] exists for tooling and tests.

pub mod jwt;
