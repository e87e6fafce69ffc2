use itertools::Itertools;
use ndarray::{Array1, ArrayView1};

/// Rescales non-negative weights so they sum to one.
///
/// When every weight is zero the result is uniform instead.
pub fn normalize(weights: ArrayView1<'_, f64>) -> Array1<f64> {
    let total = weights.sum();
    if total == 0.0 {
        let len = weights.len();
        return Array1::from_elem(len, 1.0 / len as f64);
    }
    weights.mapv(|weight| weight / total)
}

/// Shannon entropy in bits. Zero probabilities contribute nothing.
pub fn entropy(distribution: ArrayView1<'_, f64>) -> f64 {
    distribution
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum()
}

/// Probability distribution over the candidate ids of a session.
///
/// Never edited in place: every update produces a whole new state.
#[derive(Clone, Debug, PartialEq)]
pub struct BeliefState {
    ids: Vec<String>,
    probabilities: Array1<f64>,
}

impl BeliefState {
    /// Every candidate gets `1 / N`.
    pub fn uniform(ids: Vec<String>) -> Self {
        let probabilities = Array1::from_elem(ids.len(), 1.0 / ids.len() as f64);
        BeliefState { ids, probabilities }
    }

    /// Builds the state from unnormalized weights aligned with `ids`.
    pub(crate) fn from_weights(ids: Vec<String>, weights: ArrayView1<'_, f64>) -> Self {
        debug_assert_eq!(ids.len(), weights.len());
        BeliefState {
            ids,
            probabilities: normalize(weights),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn probabilities(&self) -> ArrayView1<'_, f64> {
        self.probabilities.view()
    }

    pub fn probability(&self, id: &str) -> Option<f64> {
        self.ids
            .iter()
            .position(|candidate| candidate == id)
            .map(|position| self.probabilities[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.ids
            .iter()
            .map(String::as_str)
            .zip(self.probabilities.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn max_probability(&self) -> Option<f64> {
        self.probabilities.iter().copied().reduce(f64::max)
    }

    /// The most probable candidate. The first one wins a tie.
    pub fn best(&self) -> Option<(&str, f64)> {
        self.iter()
            .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
    }

    /// The `n` most probable candidates, most probable first. Ties keep candidate order.
    pub fn top(&self, n: usize) -> Vec<(&str, f64)> {
        self.iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1))
            .take(n)
            .collect()
    }

    pub fn entropy(&self) -> f64 {
        entropy(self.probabilities.view())
    }
}
