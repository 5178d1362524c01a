//! Statistic records and quantile aggregation.
//!
//! A [`Statistic`] is the only thing the reporting layer ever sees: tagged
//! values plus labels, a variable key, and a description. The underlying
//! matrices stay inside the engine.

use serde::{Deserialize, Serialize};

use crate::bucket::BucketMatrix;
use crate::error::{EngineError, Result};

/// Closed set of statistic kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Fractions summing to 1 across buckets (when none were skipped).
    Share,
    /// A single scalar in [0, 1].
    Percentage,
    /// One weighted average per bucket.
    Mean,
    /// Reach probabilities conditional on a starting subgroup.
    Probability,
}

impl std::fmt::Display for StatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Share => write!(f, "share"),
            Self::Percentage => write!(f, "percentage"),
            Self::Mean => write!(f, "mean"),
            Self::Probability => write!(f, "probability"),
        }
    }
}

/// Metadata carried by future-distribution statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureMeta {
    /// Forecast horizon in periods.
    pub horizon: usize,
    /// Label of the conditioning subgroup.
    pub subgroup: String,
}

/// A tagged aggregate produced by the engine.
///
/// `values` and `labels` are parallel and cover the *retained* buckets
/// only: a bucket dropped by the degenerate policy is omitted from both,
/// so consumers may receive fewer entries than the requested partition but
/// never a misaligned pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub kind: StatKind,
    /// Variable key, e.g. `"income"`.
    pub key: String,
    /// Human-readable description.
    pub description: String,
    /// One entry per retained bucket; a single entry for scalar kinds.
    pub values: Vec<f64>,
    /// Labels parallel to `values`.
    pub labels: Vec<String>,
    /// Present only on future-distribution statistics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub future: Option<FutureMeta>,
}

/// Weighted share of the total value mass captured by each bucket:
/// `(M · (values ⊙ weights)) / (values · weights)`.
///
/// Shares sum to 1 across buckets whenever no bucket was skipped. Custom
/// `labels` must cover the full partition (one per bucket, skipped ones
/// included); skipped entries are filtered alongside the values.
pub fn share_statistic(
    buckets: &BucketMatrix,
    values: &[f64],
    weights: &[f64],
    key: &str,
    labels: Option<Vec<String>>,
) -> Result<Statistic> {
    check_population_shape(buckets, values, weights)?;
    let vw = weighted_values(values, weights);
    let total: f64 = vw.iter().sum();
    if total == 0.0 {
        return Err(EngineError::DivisionByZero(format!(
            "total weighted {key} is zero"
        )));
    }
    let mut shares = buckets.matrix().mul_vec(&vw)?;
    for s in &mut shares {
        *s /= total;
    }
    finish_bucket_statistic(
        StatKind::Share,
        buckets,
        shares,
        labels,
        weights,
        key,
        format!("weighted share of total {key} per bucket"),
    )
}

/// Weighted average value within each bucket:
/// `(M · (values ⊙ weights)) / (M · weights)`.
///
/// Fails with [`EngineError::DivisionByZero`] if any retained bucket
/// received zero total weight.
pub fn mean_statistic(
    buckets: &BucketMatrix,
    values: &[f64],
    weights: &[f64],
    key: &str,
    labels: Option<Vec<String>>,
) -> Result<Statistic> {
    check_population_shape(buckets, values, weights)?;
    let vw = weighted_values(values, weights);
    let value_mass = buckets.matrix().mul_vec(&vw)?;
    let weight_mass = buckets.matrix().mul_vec(weights)?;

    let mut means = vec![0.0; buckets.bucket_count()];
    for b in buckets.retained() {
        if weight_mass[b] == 0.0 {
            return Err(EngineError::DivisionByZero(format!(
                "bucket {b} received zero total weight"
            )));
        }
        means[b] = value_mass[b] / weight_mass[b];
    }
    finish_bucket_statistic(
        StatKind::Mean,
        buckets,
        means,
        labels,
        weights,
        key,
        format!("weighted mean {key} per bucket"),
    )
}

/// Fraction of the total value-weighted mass held by a subgroup.
///
/// `subgroup` is a 0/1 indicator (fractional membership is accepted)
/// parallel to the population.
pub fn subgroup_share_statistic(
    subgroup: &[f64],
    values: &[f64],
    weights: &[f64],
    key: &str,
) -> Result<Statistic> {
    if subgroup.len() != values.len() || values.len() != weights.len() {
        return Err(EngineError::ShapeMismatch(format!(
            "{} subgroup entries, {} values, {} weights",
            subgroup.len(),
            values.len(),
            weights.len()
        )));
    }
    let total: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    if total == 0.0 {
        return Err(EngineError::DivisionByZero(format!(
            "total weighted {key} is zero"
        )));
    }
    let held: f64 = subgroup
        .iter()
        .zip(values)
        .zip(weights)
        .map(|((s, v), w)| s * v * w)
        .sum();
    Ok(Statistic {
        kind: StatKind::Percentage,
        key: key.to_string(),
        description: format!("share of total {key} held by the subgroup"),
        values: vec![held / total],
        labels: vec!["subgroup".to_string()],
        future: None,
    })
}

fn weighted_values(values: &[f64], weights: &[f64]) -> Vec<f64> {
    values.iter().zip(weights).map(|(v, w)| v * w).collect()
}

fn check_population_shape(
    buckets: &BucketMatrix,
    values: &[f64],
    weights: &[f64],
) -> Result<()> {
    if values.len() != weights.len() || values.len() != buckets.agent_count() {
        return Err(EngineError::ShapeMismatch(format!(
            "{} values, {} weights, bucket matrix over {} agents",
            values.len(),
            weights.len(),
            buckets.agent_count()
        )));
    }
    Ok(())
}

/// Filter a full-length per-bucket vector down to the retained buckets and
/// attach labels (caller-supplied or the weight-based defaults).
fn finish_bucket_statistic(
    kind: StatKind,
    buckets: &BucketMatrix,
    full_values: Vec<f64>,
    labels: Option<Vec<String>>,
    weights: &[f64],
    key: &str,
    description: String,
) -> Result<Statistic> {
    let labels = match labels {
        Some(l) => {
            if l.len() != buckets.bucket_count() {
                return Err(EngineError::ShapeMismatch(format!(
                    "{} labels for {} buckets",
                    l.len(),
                    buckets.bucket_count()
                )));
            }
            l
        }
        None => buckets.percentile_labels(weights)?,
    };
    let retained = buckets.retained();
    Ok(Statistic {
        kind,
        key: key.to_string(),
        description,
        values: retained.iter().map(|&b| full_values[b]).collect(),
        labels: retained.iter().map(|&b| labels[b].clone()).collect(),
        future: None,
    })
}
