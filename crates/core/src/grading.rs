//! Grade thresholds and the threshold classifier.
//!
//! An OBE configuration carries an ordered list of grade thresholds. A value
//! gets the first grade (highest threshold first) whose minimum it meets or
//! exceeds, and the fallback grade if it meets none.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CoreError, ObeError};

/// Grade given to values below every threshold.
pub const DEFAULT_FALLBACK_GRADE: &str = "F";

/// Default minimum percentage to pass.
pub const DEFAULT_PASS_PERCENTAGE: f64 = 50.0;

/// One grade boundary, e.g. `A` for values `>= 90`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct GradeThreshold {
    #[validate(length(min = 1, max = 8))]
    pub grade: String,
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_percent: f64,
}

/// The grading part of an OBE configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeScale {
    pub thresholds: Vec<GradeThreshold>,
    pub fallback_grade: String,
    pub pass_percentage: f64,
}

impl Default for GradeScale {
    /// A>=90, B>=80, C>=70, D>=60, F below; pass at 50.
    fn default() -> Self {
        let threshold = |grade: &str, min_percent: f64| GradeThreshold {
            grade: grade.to_string(),
            min_percent,
        };
        Self {
            thresholds: vec![
                threshold("A", 90.0),
                threshold("B", 80.0),
                threshold("C", 70.0),
                threshold("D", 60.0),
            ],
            fallback_grade: DEFAULT_FALLBACK_GRADE.to_string(),
            pass_percentage: DEFAULT_PASS_PERCENTAGE,
        }
    }
}

impl GradeScale {
    /// Thresholds ordered from highest minimum to lowest.
    pub fn descending(&self) -> Vec<&GradeThreshold> {
        let mut ordered: Vec<_> = self.thresholds.iter().collect();
        ordered.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));
        ordered
    }

    /// Grade for `value` under this scale.
    pub fn grade_for(&self, value: f64) -> &str {
        self.descending()
            .into_iter()
            .find(|t| value >= t.min_percent)
            .map(|t| t.grade.as_str())
            .unwrap_or(self.fallback_grade.as_str())
    }

    pub fn is_passing(&self, value: f64) -> bool {
        value >= self.pass_percentage
    }
}

/// Classify `value` against the active scale.
///
/// With no active configuration this fails with
/// [`ObeError::ConfigMissing`] rather than falling back to a default scale.
pub fn classify(value: f64, active: Option<&GradeScale>) -> Result<&str, ObeError> {
    active
        .map(|scale| scale.grade_for(value))
        .ok_or(ObeError::ConfigMissing)
}

/// Validate a scale before it is stored.
pub fn validate_scale(scale: &GradeScale) -> Result<(), CoreError> {
    if scale.thresholds.is_empty() {
        return Err(CoreError::Validation(
            "At least one grade threshold is required".into(),
        ));
    }

    let mut grades = HashSet::new();
    let mut minimums = Vec::with_capacity(scale.thresholds.len());
    for threshold in &scale.thresholds {
        threshold.validate().map_err(|e| {
            CoreError::Validation(format!("Invalid threshold '{}': {e}", threshold.grade))
        })?;
        if !grades.insert(threshold.grade.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate grade '{}'",
                threshold.grade
            )));
        }
        if minimums.iter().any(|m: &f64| *m == threshold.min_percent) {
            return Err(CoreError::Validation(format!(
                "Duplicate minimum percentage {}",
                threshold.min_percent
            )));
        }
        minimums.push(threshold.min_percent);
    }

    if scale.fallback_grade.trim().is_empty() {
        return Err(CoreError::Validation(
            "fallback_grade must not be empty".into(),
        ));
    }
    if grades.contains(scale.fallback_grade.as_str()) {
        return Err(CoreError::Validation(format!(
            "fallback_grade '{}' must not also be a threshold grade",
            scale.fallback_grade
        )));
    }
    if !(0.0..=100.0).contains(&scale.pass_percentage) {
        return Err(CoreError::Validation(format!(
            "pass_percentage must be between 0 and 100, got {}",
            scale.pass_percentage
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn boundary_values() {
        let scale = GradeScale::default();
        assert_eq!(classify(90.0, Some(&scale)), Ok("A"));
        assert_eq!(classify(89.999, Some(&scale)), Ok("B"));
        assert_eq!(classify(80.0, Some(&scale)), Ok("B"));
        assert_eq!(classify(60.0, Some(&scale)), Ok("D"));
        assert_eq!(classify(59.99, Some(&scale)), Ok("F"));
        assert_eq!(classify(0.0, Some(&scale)), Ok("F"));
        assert_eq!(classify(100.0, Some(&scale)), Ok("A"));
    }

    #[test]
    fn no_active_config_is_an_error() {
        assert_eq!(classify(95.0, None), Err(ObeError::ConfigMissing));
    }

    #[test]
    fn threshold_order_in_storage_does_not_matter() {
        let mut scale = GradeScale::default();
        scale.thresholds.reverse();
        assert_eq!(scale.grade_for(85.0), "B");
        assert_eq!(scale.grade_for(91.0), "A");
    }

    #[test]
    fn passing_uses_pass_percentage() {
        let scale = GradeScale::default();
        assert!(scale.is_passing(50.0));
        assert!(!scale.is_passing(49.9));
    }

    #[test]
    fn default_scale_is_valid() {
        assert!(validate_scale(&GradeScale::default()).is_ok());
    }

    #[test]
    fn rejects_empty_thresholds() {
        let scale = GradeScale {
            thresholds: vec![],
            ..GradeScale::default()
        };
        assert_matches!(validate_scale(&scale), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut scale = GradeScale::default();
        scale.thresholds[0].min_percent = 120.0;
        assert_matches!(validate_scale(&scale), Err(CoreError::Validation(_)));
    }

    #[test]
    fn rejects_duplicate_grade_or_minimum() {
        let mut scale = GradeScale::default();
        scale.thresholds[1].grade = "A".into();
        assert!(validate_scale(&scale).is_err());

        let mut scale = GradeScale::default();
        scale.thresholds[1].min_percent = 90.0;
        assert!(validate_scale(&scale).is_err());
    }

    #[test]
    fn rejects_fallback_that_shadows_a_grade() {
        let scale = GradeScale {
            fallback_grade: "D".into(),
            ..GradeScale::default()
        };
        assert!(validate_scale(&scale).is_err());
    }

    #[test]
    fn rejects_pass_percentage_out_of_range() {
        let scale = GradeScale {
            pass_percentage: -5.0,
            ..GradeScale::default()
        };
        assert!(validate_scale(&scale).is_err());
    }
}
