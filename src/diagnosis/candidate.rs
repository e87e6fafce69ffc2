use crate::diagnosis::diagnosis_session::SessionError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Probability used for an attribute a candidate says nothing about.
pub const UNINFORMATIVE_PRIOR: f64 = 0.5;

/// One pest the diagnosis can end on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub scientific_name: String,
    /// Probability that each attribute holds for this pest.
    #[serde(default)]
    pub attributes: HashMap<String, f64>,
}

impl Candidate {
    /// P(attribute | candidate), or [`UNINFORMATIVE_PRIOR`] when the attribute is not listed.
    pub fn attribute_probability(&self, attribute_key: &str) -> f64 {
        match self.attributes.get(attribute_key) {
            Some(probability) => *probability,
            None => UNINFORMATIVE_PRIOR,
        }
    }
}

/// The validated, immutable candidate set of a session.
#[derive(Clone, Debug)]
pub struct CandidateTable {
    candidates: Vec<Candidate>,
    index: HashMap<String, usize>,
}

impl CandidateTable {
    /// Rejects empty tables, duplicate ids and attribute probabilities outside [0, 1].
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, SessionError> {
        if candidates.is_empty() {
            return Err(SessionError::EmptyCandidateSet);
        }
        let mut seen: HashSet<&str> = HashSet::with_capacity(candidates.len());
        for candidate in &candidates {
            if !seen.insert(candidate.id.as_str()) {
                return Err(SessionError::DuplicateCandidate(candidate.id.clone()));
            }
            for (attribute, value) in &candidate.attributes {
                if !value.is_finite() || !(0.0..=1.0).contains(value) {
                    return Err(SessionError::InvalidAttributeProbability {
                        candidate: candidate.id.clone(),
                        attribute: attribute.clone(),
                        value: *value,
                    });
                }
            }
        }
        let index = candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| (candidate.id.clone(), position))
            .collect();
        Ok(CandidateTable { candidates, index })
    }

    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.index.get(id).map(|position| &self.candidates[*position])
    }

    pub fn ids(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// P(attribute | c) for each id in `ids`, in that order.
    ///
    /// An id with no candidate in the table gets [`UNINFORMATIVE_PRIOR`].
    pub fn likelihoods(&self, ids: &[String], attribute_key: &str) -> Array1<f64> {
        ids.iter()
            .map(|id| match self.get(id) {
                Some(candidate) => candidate.attribute_probability(attribute_key),
                None => UNINFORMATIVE_PRIOR,
            })
            .collect()
    }
}
