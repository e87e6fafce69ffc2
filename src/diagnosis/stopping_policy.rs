use crate::diagnosis::asked_set::AskedSet;
use crate::diagnosis::belief_state::BeliefState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a diagnosis stopped asking questions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// One candidate is above the confidence threshold.
    Confident,
    /// The question budget is used up.
    BudgetExhausted,
    /// Every question in the catalog was asked.
    QuestionsExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Confident => write!(f, "confident"),
            StopReason::BudgetExhausted => write!(f, "question budget exhausted"),
            StopReason::QuestionsExhausted => write!(f, "no questions left"),
        }
    }
}

/// Decides when the question loop ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoppingPolicy {
    /// Stop once a candidate's probability is strictly above this.
    pub confidence_threshold: f64,
    /// Stop once this many questions were asked.
    pub question_budget: usize,
}

impl Default for StoppingPolicy {
    fn default() -> Self {
        StoppingPolicy {
            confidence_threshold: 0.80,
            question_budget: 10,
        }
    }
}

impl StoppingPolicy {
    pub fn should_stop(&self, belief: &BeliefState, asked: &AskedSet) -> bool {
        self.stop_reason(belief, asked).is_some()
    }

    /// Confidence is checked before the budget.
    pub fn stop_reason(&self, belief: &BeliefState, asked: &AskedSet) -> Option<StopReason> {
        let best = belief.max_probability().unwrap_or(0.0);
        if best > self.confidence_threshold {
            Some(StopReason::Confident)
        } else if asked.len() >= self.question_budget {
            Some(StopReason::BudgetExhausted)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("pest_{i}")).collect()
    }

    #[test]
    fn keeps_going_while_uncertain() {
        let policy = StoppingPolicy::default();
        let belief = BeliefState::uniform(ids(4));
        let asked: AskedSet = ["a", "b", "c"].into_iter().collect();
        assert!(!policy.should_stop(&belief, &asked));
    }

    #[test]
    fn stops_on_budget() {
        let policy = StoppingPolicy::default();
        let belief = BeliefState::uniform(ids(4));
        let asked: AskedSet = (0..10).map(|i| format!("attribute_{i}")).collect();
        assert!(policy.should_stop(&belief, &asked));
        assert_eq!(
            policy.stop_reason(&belief, &asked),
            Some(StopReason::BudgetExhausted)
        );
    }

    #[test]
    fn stops_on_confidence() {
        let policy = StoppingPolicy::default();
        let belief = BeliefState::uniform(ids(1));
        assert_eq!(
            policy.stop_reason(&belief, &AskedSet::new()),
            Some(StopReason::Confident)
        );
    }

    #[test]
    fn confidence_threshold_is_strict() {
        let policy = StoppingPolicy {
            confidence_threshold: 0.5,
            question_budget: 10,
        };
        let belief = BeliefState::uniform(ids(2));
        assert!(!policy.should_stop(&belief, &AskedSet::new()));
    }

    #[test]
    fn deserializes_partial_config() {
        let policy: StoppingPolicy = serde_json::from_str(r#"{"question_budget": 5}"#).unwrap();
        assert_eq!(policy.question_budget, 5);
        assert_eq!(policy.confidence_threshold, 0.80);
    }
}
