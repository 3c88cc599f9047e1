use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Obe(#[from] ObeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Recoverable conditions raised by the attainment computations.
///
/// Batch computations carry these per item instead of failing the whole
/// scope, so the caller decides whether to surface an error or render
/// "no data".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObeError {
    #[error("No active OBE configuration")]
    ConfigMissing,

    #[error("Attainment is undefined for zero total marks")]
    DivisionUndefined,

    #[error("No mapped outcomes contribute to this scope")]
    NoMappedOutcomes,

    #[error("Inconsistent input: {0}")]
    InconsistentInput(String),
}
