//! Weighted agent populations.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// An ordered sequence of agents, each carrying a real value and a
/// non-negative weight. Weights need not sum to 1 — statistics normalize
/// internally. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Population {
    values: Vec<f64>,
    weights: Vec<f64>,
}

impl Population {
    /// Build a population from parallel value/weight vectors.
    ///
    /// Fails with [`EngineError::ShapeMismatch`] on unequal lengths or on
    /// any negative or non-finite weight.
    pub fn new(values: Vec<f64>, weights: Vec<f64>) -> Result<Self> {
        if values.len() != weights.len() {
            return Err(EngineError::ShapeMismatch(format!(
                "{} values vs {} weights",
                values.len(),
                weights.len()
            )));
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(EngineError::ShapeMismatch(format!("invalid weight {w}")));
        }
        Ok(Self { values, weights })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Total (unnormalized) population weight.
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Permutation that sorts `values` ascending. Ties keep input order.
pub(crate) fn sort_permutation(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

/// Cumulative weights along `order`, normalized so the last entry is
/// exactly 1.0.
pub(crate) fn cumulative_weights(weights: &[f64], order: &[usize]) -> Result<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(EngineError::DivisionByZero(
            "population has zero total weight".into(),
        ));
    }
    let mut cum = Vec::with_capacity(order.len());
    let mut acc = 0.0;
    for &i in order {
        acc += weights[i];
        cum.push(acc / total);
    }
    if let Some(last) = cum.last_mut() {
        // Pin the endpoint against accumulated rounding.
        *last = 1.0;
    }
    Ok(cum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = Population::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        let err = Population::new(vec![1.0, 2.0], vec![1.0, -0.5]).unwrap_err();
        assert!(matches!(err, EngineError::ShapeMismatch(_)));
    }

    #[test]
    fn test_sort_permutation_is_stable() {
        let order = sort_permutation(&[3.0, 1.0, 3.0, 2.0]);
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_cumulative_weights_end_at_one() {
        let weights = vec![0.3, 0.3, 0.1];
        let order = vec![0, 1, 2];
        let cum = cumulative_weights(&weights, &order).unwrap();
        assert_eq!(cum.len(), 3);
        assert_eq!(*cum.last().unwrap(), 1.0);
        assert!((cum[0] - 0.3 / 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_weights_reject_zero_total() {
        let err = cumulative_weights(&[0.0, 0.0], &[0, 1]).unwrap_err();
        assert!(matches!(err, EngineError::DivisionByZero(_)));
    }
}
