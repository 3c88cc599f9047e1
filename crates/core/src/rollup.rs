//! Weighted rollup of outcome attainments along mapping edges.
//!
//! The same algorithm serves CLO->PLO and PLO->PEO: a target outcome's
//! attainment is the weighted mean of every source attainment mapped to it,
//! `sum(attainment * weight) / sum(weight)`, where the weight comes from the
//! mapping strength.
//!
//! Contributions are sorted before summation so the result does not depend
//! on the order rows came back from the database.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::ObeError;
use crate::outcome::Strength;
use crate::types::DbId;

/// One mapping edge from a lower-level outcome to a higher-level one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeLink {
    pub source_id: DbId,
    pub target_id: DbId,
    pub strength: Strength,
}

/// One attainment observation for a source outcome.
///
/// A CLO attained by forty students in scope yields forty observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceAttainment {
    pub outcome_id: DbId,
    pub percent: f64,
}

/// Rolled-up attainment of a target outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RollupValue {
    Attained { percent: f64, contributions: usize },
    /// Nothing in scope is mapped to this outcome.
    NoData,
}

impl RollupValue {
    pub fn percent(&self) -> Option<f64> {
        match self {
            RollupValue::Attained { percent, .. } => Some(*percent),
            RollupValue::NoData => None,
        }
    }

    /// The attained percentage, or [`ObeError::NoMappedOutcomes`].
    pub fn require(&self) -> Result<f64, ObeError> {
        self.percent().ok_or(ObeError::NoMappedOutcomes)
    }
}

/// Adjacency lists from source outcome to `(target, strength)`.
#[derive(Debug, Clone, Default)]
pub struct OutcomeGraph {
    edges: BTreeMap<DbId, BTreeMap<DbId, Strength>>,
}

impl OutcomeGraph {
    /// Build the graph from mapping rows.
    ///
    /// If the same pair appears twice the stronger mapping wins.
    pub fn new(links: impl IntoIterator<Item = OutcomeLink>) -> Self {
        let mut edges: BTreeMap<DbId, BTreeMap<DbId, Strength>> = BTreeMap::new();
        for link in links {
            let strength = edges
                .entry(link.source_id)
                .or_default()
                .entry(link.target_id)
                .or_insert(link.strength);
            *strength = (*strength).max(link.strength);
        }
        Self { edges }
    }

    /// Targets a source outcome is mapped to.
    pub fn targets_of(&self, source_id: DbId) -> impl Iterator<Item = (DbId, Strength)> + '_ {
        self.edges
            .get(&source_id)
            .into_iter()
            .flat_map(|m| m.iter().map(|(t, s)| (*t, *s)))
    }

    /// Roll `sources` up into every outcome in `targets`.
    ///
    /// Targets reached through an edge but missing from `targets` are
    /// included too. A target with no contributing source is
    /// [`RollupValue::NoData`].
    pub fn rollup(
        &self,
        sources: &[SourceAttainment],
        targets: &[DbId],
    ) -> BTreeMap<DbId, RollupValue> {
        let mut contributions: BTreeMap<DbId, Vec<(f64, f64)>> =
            targets.iter().map(|t| (*t, Vec::new())).collect();

        for source in sources {
            for (target, strength) in self.targets_of(source.outcome_id) {
                contributions
                    .entry(target)
                    .or_default()
                    .push((source.percent, strength.weight()));
            }
        }

        contributions
            .into_iter()
            .map(|(target, pairs)| (target, weighted_mean(pairs)))
            .collect()
    }
}

/// CLO->PLO rollup over per-student CLO attainments.
pub fn rollup_to_plo(
    clo_attainments: &[SourceAttainment],
    mappings: &[OutcomeLink],
    plo_ids: &[DbId],
) -> BTreeMap<DbId, RollupValue> {
    OutcomeGraph::new(mappings.iter().copied()).rollup(clo_attainments, plo_ids)
}

/// PLO->PEO rollup over already rolled-up PLO attainments.
pub fn rollup_to_peo(
    plo_attainments: &BTreeMap<DbId, RollupValue>,
    mappings: &[OutcomeLink],
    peo_ids: &[DbId],
) -> BTreeMap<DbId, RollupValue> {
    let sources = sources_from_rollup(plo_attainments);
    OutcomeGraph::new(mappings.iter().copied()).rollup(&sources, peo_ids)
}

/// One observation per attained outcome of a previous rollup.
pub fn sources_from_rollup(values: &BTreeMap<DbId, RollupValue>) -> Vec<SourceAttainment> {
    values
        .iter()
        .filter_map(|(id, v)| {
            v.percent().map(|percent| SourceAttainment {
                outcome_id: *id,
                percent,
            })
        })
        .collect()
}

fn weighted_mean(mut pairs: Vec<(f64, f64)>) -> RollupValue {
    if pairs.is_empty() {
        return RollupValue::NoData;
    }
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

    let numerator: f64 = pairs.iter().map(|(value, weight)| value * weight).sum();
    let denominator: f64 = pairs.iter().map(|(_, weight)| weight).sum();

    RollupValue::Attained {
        percent: numerator / denominator,
        contributions: pairs.len(),
    }
}

/// Sum after sorting, so equal multisets give bit-identical totals.
pub(crate) fn sorted_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.iter().sum()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn link(source_id: DbId, target_id: DbId, strength: Strength) -> OutcomeLink {
        OutcomeLink {
            source_id,
            target_id,
            strength,
        }
    }

    fn obs(outcome_id: DbId, percent: f64) -> SourceAttainment {
        SourceAttainment {
            outcome_id,
            percent,
        }
    }

    #[test]
    fn strong_and_moderate_clos_into_one_plo() {
        // CLO1: 18/20 = 90%, strong. CLO2: 5/10 = 50%, moderate.
        let mappings = [link(1, 100, Strength::Strong), link(2, 100, Strength::Moderate)];
        let result = rollup_to_plo(&[obs(1, 90.0), obs(2, 50.0)], &mappings, &[100]);

        assert_eq!(
            result[&100],
            RollupValue::Attained {
                percent: 74.0,
                contributions: 2
            }
        );
    }

    #[test]
    fn unmapped_target_reports_no_data() {
        let mappings = [link(1, 100, Strength::Strong)];
        let result = rollup_to_plo(&[obs(1, 80.0)], &mappings, &[100, 200]);

        assert_eq!(result[&200], RollupValue::NoData);
        assert_matches!(result[&200].require(), Err(ObeError::NoMappedOutcomes));
        assert_eq!(result[&100].require(), Ok(80.0));
    }

    #[test]
    fn zero_attainment_is_not_no_data() {
        let mappings = [link(1, 100, Strength::Weak)];
        let result = rollup_to_plo(&[obs(1, 0.0)], &mappings, &[100]);
        assert_eq!(result[&100].percent(), Some(0.0));
    }

    #[test]
    fn aggregates_across_students() {
        let mappings = [link(1, 100, Strength::Strong)];
        let result = rollup_to_plo(&[obs(1, 60.0), obs(1, 80.0), obs(1, 100.0)], &mappings, &[]);
        assert_eq!(
            result[&100],
            RollupValue::Attained {
                percent: 80.0,
                contributions: 3
            }
        );
    }

    #[test]
    fn one_clo_feeds_several_plos() {
        let mappings = [link(1, 100, Strength::Strong), link(1, 200, Strength::Weak)];
        let result = rollup_to_plo(&[obs(1, 70.0)], &mappings, &[100, 200]);
        assert_eq!(result[&100].percent(), Some(70.0));
        assert_eq!(result[&200].percent(), Some(70.0));
    }

    #[test]
    fn permutation_does_not_change_result() {
        let mappings = [
            link(1, 100, Strength::Strong),
            link(2, 100, Strength::Moderate),
            link(3, 100, Strength::Weak),
            link(3, 200, Strength::Strong),
        ];
        let sources = vec![
            obs(1, 33.3),
            obs(2, 71.1),
            obs(3, 12.7),
            obs(1, 99.9),
            obs(2, 0.1),
            obs(3, 58.42),
        ];
        let expected = rollup_to_plo(&sources, &mappings, &[100, 200]);

        let mut reversed = sources.clone();
        reversed.reverse();
        assert_eq!(rollup_to_plo(&reversed, &mappings, &[100, 200]), expected);

        let mut rotated = sources.clone();
        rotated.rotate_left(2);
        let mut shuffled_mappings = mappings;
        shuffled_mappings.reverse();
        assert_eq!(
            rollup_to_plo(&rotated, &shuffled_mappings, &[200, 100]),
            expected
        );
    }

    #[test]
    fn rollup_is_idempotent() {
        let mappings = [link(1, 100, Strength::Strong), link(2, 100, Strength::Weak)];
        let sources = [obs(1, 45.0), obs(2, 88.0)];
        let first = rollup_to_plo(&sources, &mappings, &[100]);
        let second = rollup_to_plo(&sources, &mappings, &[100]);
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_mapping_keeps_stronger() {
        let graph = OutcomeGraph::new([link(1, 100, Strength::Weak), link(1, 100, Strength::Strong)]);
        let targets: Vec<_> = graph.targets_of(1).collect();
        assert_eq!(targets, vec![(100, Strength::Strong)]);
    }

    #[test]
    fn plo_attainments_roll_into_peo() {
        let plos = BTreeMap::from([
            (
                100,
                RollupValue::Attained {
                    percent: 74.0,
                    contributions: 2,
                },
            ),
            (
                200,
                RollupValue::Attained {
                    percent: 50.0,
                    contributions: 1,
                },
            ),
            (300, RollupValue::NoData),
        ]);
        let mappings = [
            link(100, 1000, Strength::Strong),
            link(200, 1000, Strength::Strong),
            link(300, 2000, Strength::Strong),
        ];
        let result = rollup_to_peo(&plos, &mappings, &[1000, 2000]);

        assert_eq!(result[&1000].percent(), Some(62.0));
        assert_eq!(result[&2000], RollupValue::NoData);
    }

    #[test]
    fn sorted_sum_is_order_independent() {
        let a = vec![0.1, 0.2, 0.3, 1e16, -1e16];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(sorted_sum(a), sorted_sum(b));
    }
}
