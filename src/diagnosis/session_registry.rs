use crate::diagnosis::candidate::Candidate;
use crate::diagnosis::diagnosis_session::{
    DiagnosisOutcome, DiagnosisSession, NextQuestion, SessionError,
};
use crate::diagnosis::question_catalog::QuestionCatalog;
use crate::diagnosis::stopping_policy::StoppingPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keeps the open diagnosis sessions of one catalog, addressed by id.
///
/// All sessions share the catalog and stopping policy the registry was built with.
#[derive(Debug)]
pub struct SessionRegistry {
    catalog: Arc<QuestionCatalog>,
    policy: StoppingPolicy,
    sessions: HashMap<SessionId, DiagnosisSession>,
    next_id: u64,
}

impl SessionRegistry {
    pub fn new(catalog: QuestionCatalog, policy: StoppingPolicy) -> Self {
        SessionRegistry {
            catalog: Arc::new(catalog),
            policy,
            sessions: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn start(&mut self, candidates: Vec<Candidate>) -> Result<SessionId, SessionError> {
        let session = DiagnosisSession::new(candidates, Arc::clone(&self.catalog), self.policy)?;
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.insert(id, session);
        log::debug!("Opened diagnosis session {id}");
        Ok(id)
    }

    pub fn next_question(&mut self, id: SessionId) -> Result<NextQuestion, SessionError> {
        Ok(self.session_mut(id)?.next_question())
    }

    pub fn answer(&mut self, id: SessionId, answer: bool) -> Result<(), SessionError> {
        self.session_mut(id)?.answer(answer)
    }

    pub fn result(&self, id: SessionId) -> Result<DiagnosisOutcome, SessionError> {
        self.session(id)?.result()
    }

    /// Drops the session, returning it if it existed.
    pub fn end(&mut self, id: SessionId) -> Option<DiagnosisSession> {
        self.sessions.remove(&id)
    }

    pub fn session(&self, id: SessionId) -> Result<&DiagnosisSession, SessionError> {
        self.sessions.get(&id).ok_or(SessionError::UnknownSession(id))
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut DiagnosisSession, SessionError> {
        self.sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
