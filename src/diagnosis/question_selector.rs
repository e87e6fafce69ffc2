use crate::diagnosis::asked_set::AskedSet;
use crate::diagnosis::belief_state::{BeliefState, entropy, normalize};
use crate::diagnosis::candidate::CandidateTable;
use crate::diagnosis::question_catalog::{Question, QuestionCatalog};

/// Entropy of the belief after asking about `attribute_key`, averaged over both answers.
///
/// ```text
/// p_yes = sum_c belief[c] * P(attr | c)
/// E[H]  = p_yes * H(posterior | yes) + (1 - p_yes) * H(posterior | no)
/// ```
pub fn expected_posterior_entropy(
    belief: &BeliefState,
    candidates: &CandidateTable,
    attribute_key: &str,
) -> f64 {
    let prior = belief.probabilities();
    let likelihood_yes = candidates.likelihoods(belief.ids(), attribute_key);
    let likelihood_no = likelihood_yes.mapv(|p| 1.0 - p);

    let posterior_yes = &prior * &likelihood_yes;
    let posterior_no = &prior * &likelihood_no;
    let p_yes = posterior_yes.sum();
    let p_no = 1.0 - p_yes;

    let entropy_yes = entropy(normalize(posterior_yes.view()).view());
    let entropy_no = entropy(normalize(posterior_no.view()).view());
    p_yes * entropy_yes + p_no * entropy_no
}

/// Picks the unasked question with the lowest expected posterior entropy.
///
/// This is greedy: it looks one question ahead only. Equal scores go to the question that
/// comes first in the catalog. Returns `None` once every question has been asked.
pub fn choose_best_question<'c>(
    belief: &BeliefState,
    asked: &AskedSet,
    catalog: &'c QuestionCatalog,
    candidates: &CandidateTable,
) -> Option<&'c Question> {
    let mut best: Option<(&Question, f64)> = None;
    for question in catalog.iter() {
        if asked.contains(&question.attribute_key) {
            continue;
        }
        let score = expected_posterior_entropy(belief, candidates, &question.attribute_key);
        let improves = match best {
            Some((_, best_score)) => score < best_score,
            None => true,
        };
        if improves {
            best = Some((question, score));
        }
    }
    if let Some((question, score)) = best {
        log::debug!(
            "Chose {:?} with expected posterior entropy {:.4} bits (current {:.4})",
            question.attribute_key,
            score,
            belief.entropy()
        );
    }
    best.map(|(question, _)| question)
}
