use crate::diagnosis::belief_state::BeliefState;
use crate::diagnosis::candidate::CandidateTable;

/// Bayesian update of `belief` given the answer to the question about `attribute_key`.
///
/// Each candidate is weighted by `P(attr | c)` for a yes and `1 - P(attr | c)` for a no, then
/// the weights are renormalized. If the answer contradicts every candidate (all weights
/// zero) the result is uniform. The input is left untouched.
pub fn update_belief(
    belief: &BeliefState,
    candidates: &CandidateTable,
    attribute_key: &str,
    answer: bool,
) -> BeliefState {
    let likelihood_yes = candidates.likelihoods(belief.ids(), attribute_key);
    let likelihood = if answer {
        likelihood_yes
    } else {
        likelihood_yes.mapv(|p| 1.0 - p)
    };
    let weights = &belief.probabilities() * &likelihood;
    if weights.sum() == 0.0 {
        log::debug!(
            "Answer {} to {:?} ruled out every candidate, resetting to uniform",
            answer,
            attribute_key
        );
    }
    BeliefState::from_weights(belief.ids().to_vec(), weights.view())
}
