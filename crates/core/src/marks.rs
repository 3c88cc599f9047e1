//! Server-side recomputation of denormalized mark totals.
//!
//! `total_marks` and `obtained_marks` on marks and assessment rows are
//! always derived from the component values here; request bodies never
//! carry them.

use serde::Serialize;

use crate::attainment::{attainment_percent, validate_component_score, ComponentScore};
use crate::error::{CoreError, ObeError};
use crate::rollup::sorted_sum;

pub const COMPONENT_MIDTERM: &str = "midterm";
pub const COMPONENT_ASSIGNMENT: &str = "assignment";
pub const COMPONENT_QUIZ: &str = "quiz";
pub const COMPONENT_CEP: &str = "cep";
pub const COMPONENT_FINAL: &str = "final";
pub const COMPONENT_PRACTICAL: &str = "practical";

/// All valid assessment component names.
pub const VALID_COMPONENTS: &[&str] = &[
    COMPONENT_MIDTERM,
    COMPONENT_ASSIGNMENT,
    COMPONENT_QUIZ,
    COMPONENT_CEP,
    COMPONENT_FINAL,
    COMPONENT_PRACTICAL,
];

/// Recomputed aggregate for a marks or assessment row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkTotals {
    pub obtained_marks: f64,
    pub total_marks: f64,
}

impl MarkTotals {
    pub fn percentage(&self) -> Result<f64, ObeError> {
        attainment_percent(self.obtained_marks, self.total_marks)
    }
}

/// Theory/lab split as entered in the gradebook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TheoryLab {
    pub theory_obtained: f64,
    pub theory_total: f64,
    pub lab_obtained: f64,
    pub lab_total: f64,
}

pub fn validate_component_name(name: &str) -> Result<(), CoreError> {
    if VALID_COMPONENTS.contains(&name) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown assessment component: '{name}'. Valid components: {}",
            VALID_COMPONENTS.join(", ")
        )))
    }
}

/// Longest accepted exam type label, e.g. `"mid"`, `"final"`, `"fall-2025-final"`.
pub const MAX_EXAM_TYPE_LEN: usize = 32;

pub fn validate_exam_type(exam_type: &str) -> Result<(), CoreError> {
    let trimmed = exam_type.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("exam_type must not be empty".into()));
    }
    if trimmed.len() != exam_type.len() || exam_type.len() > MAX_EXAM_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "exam_type must be at most {MAX_EXAM_TYPE_LEN} characters with no surrounding whitespace"
        )));
    }
    Ok(())
}

/// Theory plus lab, each part checked on its own.
pub fn recompute_theory_lab(marks: &TheoryLab) -> Result<MarkTotals, ObeError> {
    let parts = [
        ("theory", marks.theory_obtained, marks.theory_total),
        ("lab", marks.lab_obtained, marks.lab_total),
    ];
    for (name, obtained, total) in parts {
        validate_component_score(&ComponentScore {
            component: name.to_string(),
            clo_id: None,
            obtained,
            out_of: total,
        })?;
    }

    Ok(MarkTotals {
        obtained_marks: marks.theory_obtained + marks.lab_obtained,
        total_marks: marks.theory_total + marks.lab_total,
    })
}

/// Sum of all components of one assessment.
pub fn recompute_assessment(components: &[ComponentScore]) -> Result<MarkTotals, ObeError> {
    components.iter().try_for_each(validate_component_score)?;

    Ok(MarkTotals {
        obtained_marks: sorted_sum(components.iter().map(|c| c.obtained).collect()),
        total_marks: sorted_sum(components.iter().map(|c| c.out_of).collect()),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn component(name: &str, obtained: f64, out_of: f64) -> ComponentScore {
        ComponentScore {
            component: name.to_string(),
            clo_id: None,
            obtained,
            out_of,
        }
    }

    #[test]
    fn theory_plus_lab() {
        let totals = recompute_theory_lab(&TheoryLab {
            theory_obtained: 55.0,
            theory_total: 75.0,
            lab_obtained: 20.0,
            lab_total: 25.0,
        })
        .unwrap();
        assert_eq!(
            totals,
            MarkTotals {
                obtained_marks: 75.0,
                total_marks: 100.0
            }
        );
        assert_eq!(totals.percentage(), Ok(75.0));
    }

    #[test]
    fn lab_above_its_total_is_inconsistent() {
        let result = recompute_theory_lab(&TheoryLab {
            theory_obtained: 10.0,
            theory_total: 75.0,
            lab_obtained: 30.0,
            lab_total: 25.0,
        });
        assert_matches!(result, Err(ObeError::InconsistentInput(msg)) if msg.contains("lab"));
    }

    #[test]
    fn assessment_sums_components() {
        let totals = recompute_assessment(&[
            component(COMPONENT_MIDTERM, 18.0, 25.0),
            component(COMPONENT_QUIZ, 4.5, 5.0),
            component(COMPONENT_FINAL, 40.0, 50.0),
        ])
        .unwrap();
        assert_eq!(totals.obtained_marks, 62.5);
        assert_eq!(totals.total_marks, 80.0);
        assert!(totals.obtained_marks <= totals.total_marks);
    }

    #[test]
    fn assessment_rejects_inconsistent_component() {
        assert!(recompute_assessment(&[component(COMPONENT_CEP, 11.0, 10.0)]).is_err());
    }

    #[test]
    fn empty_assessment_has_undefined_percentage() {
        let totals = recompute_assessment(&[]).unwrap();
        assert_eq!(totals.percentage(), Err(ObeError::DivisionUndefined));
    }

    #[test]
    fn exam_types() {
        assert!(validate_exam_type("final").is_ok());
        assert!(validate_exam_type("").is_err());
        assert!(validate_exam_type(" mid").is_err());
        assert!(validate_exam_type(&"x".repeat(MAX_EXAM_TYPE_LEN + 1)).is_err());
    }

    #[test]
    fn component_names() {
        assert!(validate_component_name("midterm").is_ok());
        assert!(validate_component_name("practical").is_ok());
        assert_matches!(
            validate_component_name("viva"),
            Err(CoreError::Validation(_))
        );
    }
}
