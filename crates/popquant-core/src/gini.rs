//! Weighted Gini coefficient.

use crate::error::{EngineError, Result};
use crate::population::sort_permutation;
use crate::stats::{StatKind, Statistic};

/// Gini coefficient of `values` weighted by `weights`.
///
/// Discrete trapezoidal Lorenz-curve formula: with agents sorted by value
/// ascending and weights normalized to sum 1, let `S_0 = 0` and
/// `S_i = S_{i-1} + value_i * weight_i`; then
/// `G = 1 - Σ weight_i * (S_{i-1} + S_i) / S_N`.
///
/// Returns 0 for a perfectly equal population and approaches 1 as value
/// concentrates on agents with vanishing weight. Invariant under uniform
/// rescaling of the weights.
pub fn gini_coefficient(values: &[f64], weights: &[f64]) -> Result<f64> {
    if values.len() != weights.len() {
        return Err(EngineError::ShapeMismatch(format!(
            "{} values vs {} weights",
            values.len(),
            weights.len()
        )));
    }
    if values.is_empty() {
        return Err(EngineError::ShapeMismatch("empty population".into()));
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(EngineError::DivisionByZero(
            "population has zero total weight".into(),
        ));
    }

    let order = sort_permutation(values);
    let mut s_prev = 0.0;
    let mut area = 0.0;
    for &i in &order {
        let w = weights[i] / total_weight;
        let s = s_prev + values[i] * w;
        area += w * (s_prev + s);
        s_prev = s;
    }
    if s_prev == 0.0 {
        return Err(EngineError::DivisionByZero(
            "population has zero total weighted value".into(),
        ));
    }
    Ok(1.0 - area / s_prev)
}

/// [`gini_coefficient`] wrapped as a reportable statistic.
pub fn gini_statistic(values: &[f64], weights: &[f64], key: &str) -> Result<Statistic> {
    let g = gini_coefficient(values, weights)?;
    Ok(Statistic {
        kind: StatKind::Share,
        key: key.to_string(),
        description: format!("Gini coefficient of {key}"),
        values: vec![g],
        labels: vec!["gini".to_string()],
        future: None,
    })
}
