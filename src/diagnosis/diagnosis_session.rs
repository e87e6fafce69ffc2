use crate::diagnosis::asked_set::AskedSet;
use crate::diagnosis::belief_state::BeliefState;
use crate::diagnosis::belief_updater::update_belief;
use crate::diagnosis::candidate::{Candidate, CandidateTable};
use crate::diagnosis::question_catalog::{Question, QuestionCatalog};
use crate::diagnosis::question_selector::choose_best_question;
use crate::diagnosis::session_registry::SessionId;
use crate::diagnosis::stopping_policy::{StopReason, StoppingPolicy};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Cannot diagnose over an empty candidate set.")]
    EmptyCandidateSet,
    #[error("Candidate id {0:?} appears more than once.")]
    DuplicateCandidate(String),
    #[error("Candidate {candidate:?} has probability {value} for {attribute:?}, expected a value in [0, 1].")]
    InvalidAttributeProbability {
        candidate: String,
        attribute: String,
        value: f64,
    },
    #[error("Cannot {operation} while the session is {state}.")]
    InvalidSessionState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("No session with id {0}.")]
    UnknownSession(SessionId),
}

/// Where a session is in its question loop.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    /// Ready to pick the next question or conclude.
    AwaitingQuestion,
    /// A question is out and one answer is expected.
    QuestionIssued { question: Question },
    /// Terminal.
    Concluded {
        outcome: DiagnosisOutcome,
        reason: StopReason,
    },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingQuestion => "awaiting a question",
            SessionState::QuestionIssued { .. } => "waiting for an answer",
            SessionState::Concluded { .. } => "concluded",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the caller should do next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextQuestion {
    Ask(Question),
    Done,
}

/// The final answer of a diagnosis.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosisOutcome {
    Identified { candidate_id: String, probability: f64 },
    NoConfidentResult,
}

/// A single "20 questions" conversation over a fixed candidate set.
///
/// The belief and asked set only change through [`DiagnosisSession::answer`], which takes
/// `&mut self`, so a session has exactly one writer at a time.
#[derive(Clone, Debug)]
pub struct DiagnosisSession {
    candidates: CandidateTable,
    catalog: Arc<QuestionCatalog>,
    policy: StoppingPolicy,
    belief: BeliefState,
    asked: AskedSet,
    state: SessionState,
}

impl DiagnosisSession {
    /// Starts with a uniform belief over `candidates`.
    pub fn new(
        candidates: Vec<Candidate>,
        catalog: Arc<QuestionCatalog>,
        policy: StoppingPolicy,
    ) -> Result<Self, SessionError> {
        let candidates = CandidateTable::new(candidates)?;
        let belief = BeliefState::uniform(candidates.ids());
        log::debug!(
            "Starting diagnosis over {} candidates with {} questions",
            candidates.len(),
            catalog.len()
        );
        Ok(DiagnosisSession {
            candidates,
            catalog,
            policy,
            belief,
            asked: AskedSet::new(),
            state: SessionState::AwaitingQuestion,
        })
    }

    /// Issues the most informative unasked question, or concludes the session.
    ///
    /// Asking again while a question is pending returns that same question.
    pub fn next_question(&mut self) -> NextQuestion {
        match &self.state {
            SessionState::Concluded { .. } => return NextQuestion::Done,
            SessionState::QuestionIssued { question } => {
                return NextQuestion::Ask(question.clone());
            }
            SessionState::AwaitingQuestion => {}
        }

        if let Some(reason) = self.policy.stop_reason(&self.belief, &self.asked) {
            self.conclude(reason);
            return NextQuestion::Done;
        }
        let chosen =
            choose_best_question(&self.belief, &self.asked, &self.catalog, &self.candidates).cloned();
        match chosen {
            Some(question) => {
                self.state = SessionState::QuestionIssued {
                    question: question.clone(),
                };
                NextQuestion::Ask(question)
            }
            None => {
                self.conclude(StopReason::QuestionsExhausted);
                NextQuestion::Done
            }
        }
    }

    /// Applies the answer to the pending question.
    pub fn answer(&mut self, answer: bool) -> Result<(), SessionError> {
        let SessionState::QuestionIssued { question } = &self.state else {
            return Err(SessionError::InvalidSessionState {
                operation: "answer",
                state: self.state.name(),
            });
        };
        let attribute_key = question.attribute_key.clone();
        self.belief = update_belief(&self.belief, &self.candidates, &attribute_key, answer);
        self.asked.insert(&attribute_key);
        self.state = SessionState::AwaitingQuestion;
        log::debug!(
            "{:?} answered {}, {} questions asked, entropy now {:.4} bits",
            attribute_key,
            if answer { "yes" } else { "no" },
            self.asked.len(),
            self.belief.entropy()
        );
        Ok(())
    }

    /// The best candidate, available once the session has concluded.
    pub fn result(&self) -> Result<DiagnosisOutcome, SessionError> {
        match &self.state {
            SessionState::Concluded { outcome, .. } => Ok(outcome.clone()),
            state => Err(SessionError::InvalidSessionState {
                operation: "read the result",
                state: state.name(),
            }),
        }
    }

    fn conclude(&mut self, reason: StopReason) {
        let outcome = match self.belief.best() {
            Some((candidate_id, probability)) => DiagnosisOutcome::Identified {
                candidate_id: candidate_id.to_string(),
                probability,
            },
            None => DiagnosisOutcome::NoConfidentResult,
        };
        log::debug!("Diagnosis concluded ({reason}): {outcome:?}");
        self.state = SessionState::Concluded { outcome, reason };
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.state, SessionState::Concluded { .. })
    }

    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    pub fn asked(&self) -> &AskedSet {
        &self.asked
    }

    pub fn asked_count(&self) -> usize {
        self.asked.len()
    }

    pub fn question_budget(&self) -> usize {
        self.policy.question_budget
    }

    pub fn current_entropy(&self) -> f64 {
        self.belief.entropy()
    }

    /// The `n` most probable candidates right now, most probable first.
    pub fn top_candidates(&self, n: usize) -> Vec<(&Candidate, f64)> {
        self.belief
            .top(n)
            .into_iter()
            .filter_map(|(id, probability)| {
                self.candidates.get(id).map(|candidate| (candidate, probability))
            })
            .collect()
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.get(id)
    }
}
