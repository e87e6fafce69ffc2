use crate::diagnosis::candidate::Candidate;
use crate::diagnosis::question_catalog::{Question, QuestionCatalog};
use crate::object_detection::label_lookup::LabelAliases;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn open(filepath: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(filepath)
        .map(BufReader::new)
        .map_err(|source| LoadError::Io {
            path: filepath.to_path_buf(),
            source,
        })
}

/// Deserializes a whole JSON file.
pub fn read_json_file<T: DeserializeOwned>(filepath: &Path) -> Result<T, LoadError> {
    serde_json::from_reader(open(filepath)?).map_err(|source| LoadError::Json {
        path: filepath.to_path_buf(),
        source,
    })
}

/// Reads a file with the class names into a vector so that the number ids
/// which come directly from the detector can be given meaning.
///
/// Blank lines are skipped, so a trailing newline does not create an empty class.
pub fn read_labels_txt_file(filepath: &Path) -> Result<Vec<String>, LoadError> {
    let lines: io::Result<Vec<String>> = open(filepath)?.lines().collect();
    let lines = lines.map_err(|source| LoadError::Io {
        path: filepath.to_path_buf(),
        source,
    })?;
    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// Reads the candidate attribute table: a JSON array of candidates.
pub fn read_candidates_json(filepath: &Path) -> Result<Vec<Candidate>, LoadError> {
    let candidates: Vec<Candidate> = read_json_file(filepath)?;
    log::debug!("Loaded {} candidates from {:?}", candidates.len(), filepath);
    Ok(candidates)
}

/// Reads the question catalog: a JSON array of `{attribute_key, text}` in asking priority order.
pub fn read_question_catalog_json(filepath: &Path) -> Result<QuestionCatalog, LoadError> {
    let questions: Vec<Question> = read_json_file(filepath)?;
    log::debug!("Loaded {} questions from {:?}", questions.len(), filepath);
    Ok(QuestionCatalog::new(questions))
}

/// Reads a JSON object mapping detector labels to store names.
pub fn read_label_aliases_json(filepath: &Path) -> Result<LabelAliases, LoadError> {
    let aliases: HashMap<String, String> = read_json_file(filepath)?;
    Ok(LabelAliases::new(aliases))
}
