//! Mobility forecasting through per-period transition matrices.
//!
//! A forecast propagates an initial distribution (or a 0/1 subgroup
//! indicator) through one column-stochastic matrix per period, strictly in
//! order, then restates the propagated mass in terms of a future-period
//! bucket partition.

use crate::bucket::BucketMatrix;
use crate::error::{EngineError, Result};
use crate::sparse::SparseMatrix;
use crate::stats::{FutureMeta, StatKind, Statistic};

/// Propagate `distribution` through the first `nt` transition matrices:
/// `d' = T[nt] · … · T[1] · d`, one matrix consumed per period.
///
/// `distribution` may be a probability vector or a 0/1 subgroup indicator.
/// Fails with [`EngineError::HorizonOutOfRange`] when `nt` exceeds the
/// number of supplied matrices, and [`EngineError::ShapeMismatch`] when a
/// period's matrix does not accept the current state dimension.
pub fn propagate(
    distribution: &[f64],
    transitions: &[SparseMatrix],
    nt: usize,
) -> Result<Vec<f64>> {
    if nt > transitions.len() {
        return Err(EngineError::HorizonOutOfRange {
            requested: nt,
            supplied: transitions.len(),
        });
    }
    let mut dist = distribution.to_vec();
    for (period, matrix) in transitions[..nt].iter().enumerate() {
        if matrix.ncols() != dist.len() {
            return Err(EngineError::ShapeMismatch(format!(
                "period {} matrix is {}x{} but the distribution has {} states",
                period + 1,
                matrix.nrows(),
                matrix.ncols(),
                dist.len()
            )));
        }
        dist = matrix.mul_vec(&dist)?;
    }
    Ok(dist)
}

/// Propagate a subgroup `nt` periods, then restate the reached mass in
/// terms of `future_buckets`. Kind [`StatKind::Share`].
pub fn future_distribution(
    subgroup: &[f64],
    transitions: &[SparseMatrix],
    nt: usize,
    future_buckets: &BucketMatrix,
    key: &str,
    subgroup_label: &str,
) -> Result<Statistic> {
    let reached = propagate(subgroup, transitions, nt)?;
    let by_bucket = future_buckets.matrix().mul_vec(&reached)?;
    Ok(future_statistic(
        StatKind::Share,
        by_bucket,
        future_buckets,
        key,
        subgroup_label,
        nt,
        format!("distribution of {subgroup_label} across {key} buckets after {nt} period(s)"),
    ))
}

/// Conditional probability of reaching each future bucket given membership
/// in the starting subgroup: the propagated mass divided by the subgroup's
/// initial mass. Kind [`StatKind::Probability`].
pub fn future_probabilities(
    subgroup: &[f64],
    transitions: &[SparseMatrix],
    nt: usize,
    future_buckets: &BucketMatrix,
    key: &str,
    subgroup_label: &str,
) -> Result<Statistic> {
    let mass: f64 = subgroup.iter().sum();
    if mass <= 0.0 {
        return Err(EngineError::DivisionByZero(
            "subgroup has zero initial mass".into(),
        ));
    }
    let reached = propagate(subgroup, transitions, nt)?;
    let mut by_bucket = future_buckets.matrix().mul_vec(&reached)?;
    for v in &mut by_bucket {
        *v /= mass;
    }
    Ok(future_statistic(
        StatKind::Probability,
        by_bucket,
        future_buckets,
        key,
        subgroup_label,
        nt,
        format!(
            "probability of reaching each {key} bucket after {nt} period(s), starting from {subgroup_label}"
        ),
    ))
}

fn future_statistic(
    kind: StatKind,
    by_bucket: Vec<f64>,
    buckets: &BucketMatrix,
    key: &str,
    subgroup_label: &str,
    nt: usize,
    description: String,
) -> Statistic {
    let labels = buckets.index_labels();
    let retained = buckets.retained();
    Statistic {
        kind,
        key: key.to_string(),
        description,
        values: retained.iter().map(|&b| by_bucket[b]).collect(),
        labels: retained.iter().map(|&b| labels[b].clone()).collect(),
        future: Some(FutureMeta {
            horizon: nt,
            subgroup: subgroup_label.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{CutSpec, bucket_matrix};

    /// Column-stochastic matrix swapping states 0 and 1, fixing state 2.
    fn swap_01() -> SparseMatrix {
        SparseMatrix::from_triplets(3, 3, &[(0, 1, 1.0), (1, 0, 1.0), (2, 2, 1.0)]).unwrap()
    }

    #[test]
    fn test_identity_transitions_leave_distribution_unchanged() {
        let dist = vec![0.2, 0.5, 0.3];
        let transitions = vec![SparseMatrix::identity(3); 4];
        for nt in 0..=4 {
            assert_eq!(propagate(&dist, &transitions, nt).unwrap(), dist);
        }
    }

    #[test]
    fn test_double_swap_returns_to_start() {
        let subgroup = vec![1.0, 0.0, 0.0];
        let transitions = vec![swap_01(), swap_01()];
        let after_one = propagate(&subgroup, &transitions, 1).unwrap();
        assert_eq!(after_one, vec![0.0, 1.0, 0.0]);
        let after_two = propagate(&subgroup, &transitions, 2).unwrap();
        assert_eq!(after_two, subgroup);
    }

    #[test]
    fn test_horizon_beyond_supplied_matrices_fails() {
        let err = propagate(&[1.0, 0.0], &[SparseMatrix::identity(2)], 2).unwrap_err();
        assert_eq!(
            err,
            EngineError::HorizonOutOfRange {
                requested: 2,
                supplied: 1
            }
        );
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let err = propagate(&[1.0, 0.0, 0.0], &[SparseMatrix::identity(2)], 1).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_future_probabilities_under_identity_recover_membership() {
        // With identity transitions, the probability of reaching each
        // bucket is the starting agent's own membership column.
        let values = vec![10.0, 20.0, 30.0];
        let weights = vec![1.0, 1.0, 1.0];
        let buckets = bucket_matrix(&values, &weights, &CutSpec::Count(3)).unwrap();
        let subgroup = vec![1.0, 0.0, 0.0];
        let transitions = vec![SparseMatrix::identity(3); 2];
        let stat = future_probabilities(
            &subgroup,
            &transitions,
            2,
            &buckets,
            "income",
            "bottom third",
        )
        .unwrap();
        assert_eq!(stat.kind, StatKind::Probability);
        assert_eq!(stat.values, vec![1.0, 0.0, 0.0]);
        assert_eq!(
            stat.future,
            Some(FutureMeta {
                horizon: 2,
                subgroup: "bottom third".to_string()
            })
        );
    }

    #[test]
    fn test_future_distribution_reports_share_kind_and_horizon() {
        let values = vec![10.0, 20.0, 30.0];
        let weights = vec![1.0, 1.0, 1.0];
        let buckets = bucket_matrix(&values, &weights, &CutSpec::Count(3)).unwrap();
        let subgroup = vec![0.0, 1.0, 0.0];
        let transitions = vec![swap_01()];
        let stat =
            future_distribution(&subgroup, &transitions, 1, &buckets, "income", "middle third")
                .unwrap();
        assert_eq!(stat.kind, StatKind::Share);
        // The middle agent swaps into state 0, the bottom bucket.
        assert_eq!(stat.values, vec![1.0, 0.0, 0.0]);
        assert_eq!(stat.future.as_ref().unwrap().horizon, 1);
        assert_eq!(stat.labels.len(), 3);
    }

    #[test]
    fn test_zero_mass_subgroup_fails() {
        let values = vec![10.0, 20.0];
        let weights = vec![1.0, 1.0];
        let buckets = bucket_matrix(&values, &weights, &CutSpec::Thresholds(vec![0.5])).unwrap();
        let err = future_probabilities(
            &[0.0, 0.0],
            &[SparseMatrix::identity(2)],
            1,
            &buckets,
            "income",
            "nobody",
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::DivisionByZero(_)));
    }
}
