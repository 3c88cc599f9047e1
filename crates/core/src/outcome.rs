//! Outcome mapping strengths and their rollup weights.
//!
//! CLO->PLO and PLO->PEO mappings carry a qualitative strength which the
//! rollup converts into a numeric weight.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STRENGTH_STRONG: &str = "strong";
pub const STRENGTH_MODERATE: &str = "moderate";
pub const STRENGTH_WEAK: &str = "weak";

/// All valid strength labels, strongest first.
pub const VALID_STRENGTHS: &[&str] = &[STRENGTH_STRONG, STRENGTH_MODERATE, STRENGTH_WEAK];

/// Qualitative strength of an outcome mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Numeric weight used in weighted-mean rollups.
    pub fn weight(self) -> f64 {
        match self {
            Strength::Strong => 3.0,
            Strength::Moderate => 2.0,
            Strength::Weak => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strength::Strong => STRENGTH_STRONG,
            Strength::Moderate => STRENGTH_MODERATE,
            Strength::Weak => STRENGTH_WEAK,
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strength {
    type Err = CoreError;

    /// Parses a strength label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            STRENGTH_STRONG => Ok(Strength::Strong),
            STRENGTH_MODERATE => Ok(Strength::Moderate),
            STRENGTH_WEAK => Ok(Strength::Weak),
            _ => Err(CoreError::Validation(format!(
                "Unknown mapping strength: '{s}'. Valid strengths: {}",
                VALID_STRENGTHS.join(", ")
            ))),
        }
    }
}
