//! CLO attainment from raw assessment component scores.
//!
//! A CLO's attainment for one student is the share of the CLO's maximum
//! marks earned by the assessment components attributed to it, expressed
//! as a percentage in `[0, 100]`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ObeError;
use crate::rollup::sorted_sum;
use crate::types::DbId;

/// A CLO as seen by the aggregator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloDefinition {
    pub clo_id: DbId,
    pub max_marks: f64,
}

/// One raw component score for one student.
///
/// `clo_id` is `None` for components that assess no particular CLO; those
/// count towards the assessment total but not towards any attainment.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentScore {
    pub component: String,
    pub clo_id: Option<DbId>,
    pub obtained: f64,
    pub out_of: f64,
}

/// Attainment of a single CLO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CloAttainment {
    Attained { percent: f64 },
    /// The CLO is configured with zero maximum marks.
    NotApplicable,
}

impl CloAttainment {
    pub fn percent(&self) -> Option<f64> {
        match self {
            CloAttainment::Attained { percent } => Some(*percent),
            CloAttainment::NotApplicable => None,
        }
    }
}

/// Obtained/total pair for one CLO, the shape persisted as an attainment row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloMarks {
    pub clo_id: DbId,
    pub obtained: f64,
    pub total: f64,
}

/// Scores for one student, input to [`compute_batch`].
#[derive(Debug, Clone)]
pub struct StudentScores {
    pub student_id: DbId,
    pub scores: Vec<ComponentScore>,
}

/// Per-student outcome of a batch computation.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAttainment {
    pub student_id: DbId,
    pub result: Result<BTreeMap<DbId, CloAttainment>, ObeError>,
}

/// Reject a component score that cannot have come from a real assessment.
pub fn validate_component_score(score: &ComponentScore) -> Result<(), ObeError> {
    if !score.obtained.is_finite() || !score.out_of.is_finite() {
        return Err(ObeError::InconsistentInput(format!(
            "{} marks must be finite numbers",
            score.component
        )));
    }
    if score.obtained < 0.0 || score.out_of < 0.0 {
        return Err(ObeError::InconsistentInput(format!(
            "{} marks must not be negative",
            score.component
        )));
    }
    if score.obtained > score.out_of {
        return Err(ObeError::InconsistentInput(format!(
            "{} obtained ({}) exceeds out of ({})",
            score.component, score.obtained, score.out_of
        )));
    }
    Ok(())
}

/// Sum the component marks attributed to each defined CLO.
///
/// Every CLO in `clos` appears in the output, with zero obtained marks if no
/// component is attributed to it. Scores for unknown CLOs are ignored.
pub fn clo_marks(scores: &[ComponentScore], clos: &[CloDefinition]) -> Vec<CloMarks> {
    let mut attributed: BTreeMap<DbId, Vec<f64>> =
        clos.iter().map(|c| (c.clo_id, Vec::new())).collect();

    for score in scores {
        if let Some(marks) = score.clo_id.and_then(|id| attributed.get_mut(&id)) {
            marks.push(score.obtained);
        }
    }

    clos.iter()
        .map(|c| CloMarks {
            clo_id: c.clo_id,
            obtained: attributed
                .remove(&c.clo_id)
                .map(sorted_sum)
                .unwrap_or(0.0),
            total: c.max_marks,
        })
        .collect()
}

/// Compute the attainment of every defined CLO for one student.
///
/// The result is clamped to `[0, 100]`; a CLO whose maximum marks are zero
/// (or negative) is reported as [`CloAttainment::NotApplicable`].
pub fn compute_clo_attainment(
    scores: &[ComponentScore],
    clos: &[CloDefinition],
) -> BTreeMap<DbId, CloAttainment> {
    clo_marks(scores, clos)
        .into_iter()
        .map(|m| {
            let attainment = if m.total <= 0.0 {
                CloAttainment::NotApplicable
            } else {
                CloAttainment::Attained {
                    percent: (m.obtained / m.total * 100.0).clamp(0.0, 100.0),
                }
            };
            (m.clo_id, attainment)
        })
        .collect()
}

/// Run [`compute_clo_attainment`] for many students.
///
/// A student with an invalid component score gets an error entry; the rest
/// of the batch is still computed.
pub fn compute_batch(students: &[StudentScores], clos: &[CloDefinition]) -> Vec<StudentAttainment> {
    students
        .iter()
        .map(|s| {
            let result = s
                .scores
                .iter()
                .try_for_each(validate_component_score)
                .map(|()| compute_clo_attainment(&s.scores, clos));
            StudentAttainment {
                student_id: s.student_id,
                result,
            }
        })
        .collect()
}

/// Percentage for a stored obtained/total pair.
pub fn attainment_percent(obtained: f64, total: f64) -> Result<f64, ObeError> {
    if total == 0.0 {
        return Err(ObeError::DivisionUndefined);
    }
    if obtained < 0.0 || total < 0.0 {
        return Err(ObeError::InconsistentInput(format!(
            "marks must not be negative (obtained {obtained}, total {total})"
        )));
    }
    if obtained > total {
        return Err(ObeError::InconsistentInput(format!(
            "obtained ({obtained}) exceeds total ({total})"
        )));
    }
    Ok(obtained / total * 100.0)
}
