use serde::{Deserialize, Serialize};

/// A yes/no question about one attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub attribute_key: String,
    pub text: String,
}

impl Question {
    pub fn new(attribute_key: impl Into<String>, text: impl Into<String>) -> Self {
        Question {
            attribute_key: attribute_key.into(),
            text: text.into(),
        }
    }
}

/// Every question the diagnosis may ask, in a fixed order.
///
/// The order matters: it decides which question is picked when two are equally informative.
/// A catalog is built once and shared read-only by all sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Later questions reusing an attribute key are ignored.
    pub fn new(questions: Vec<Question>) -> Self {
        let mut unique: Vec<Question> = Vec::with_capacity(questions.len());
        for question in questions {
            if unique
                .iter()
                .any(|kept| kept.attribute_key == question.attribute_key)
            {
                log::warn!(
                    "Ignoring repeated question for attribute {:?}",
                    question.attribute_key
                );
                continue;
            }
            unique.push(question);
        }
        QuestionCatalog { questions: unique }
    }

    pub fn get(&self, attribute_key: &str) -> Option<&Question> {
        self.questions
            .iter()
            .find(|question| question.attribute_key == attribute_key)
    }

    pub fn text(&self, attribute_key: &str) -> Option<&str> {
        self.get(attribute_key).map(|question| question.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl FromIterator<Question> for QuestionCatalog {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        QuestionCatalog::new(iter.into_iter().collect())
    }
}
