//! CLO->PLO and PLO->PEO mapping rows.
//!
//! `strength` is stored as text (`strong` / `moderate` / `weak`, enforced by
//! a CHECK constraint) and parsed into [`Strength`] when building the
//! rollup graph.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::error::CoreError;
use uniportal_core::outcome::Strength;
use uniportal_core::rollup::OutcomeLink;
use uniportal_core::types::{DbId, Timestamp};

/// A row from the `clo_plo_mappings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CloPloMapping {
    pub id: DbId,
    pub clo_id: DbId,
    pub plo_id: DbId,
    pub strength: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CloPloMapping {
    pub fn link(&self) -> Result<OutcomeLink, CoreError> {
        Ok(OutcomeLink {
            source_id: self.clo_id,
            target_id: self.plo_id,
            strength: self.strength.parse()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCloPloMapping {
    pub clo_id: DbId,
    pub plo_id: DbId,
    pub strength: Strength,
}

/// A row from the `plo_peo_mappings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PloPeoMapping {
    pub id: DbId,
    pub plo_id: DbId,
    pub peo_id: DbId,
    pub strength: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PloPeoMapping {
    pub fn link(&self) -> Result<OutcomeLink, CoreError> {
        Ok(OutcomeLink {
            source_id: self.plo_id,
            target_id: self.peo_id,
            strength: self.strength.parse()?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePloPeoMapping {
    pub plo_id: DbId,
    pub peo_id: DbId,
    pub strength: Strength,
}
