use crate::data_io::table_io::{LoadError, read_json_file};
use crate::diagnosis::stopping_policy::StoppingPolicy;
use crate::object_detection::detection_pipeline::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every tunable threshold of the crate.
///
/// Each section falls back to its defaults, so a file only needs the values it changes:
///
/// ```json
/// {
///   "detection": { "confidence_threshold": 0.3 },
///   "diagnosis": { "question_budget": 12 }
/// }
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub diagnosis: StoppingPolicy,
}

impl AppConfig {
    pub fn from_json_file(filepath: &Path) -> Result<Self, LoadError> {
        let config: AppConfig = read_json_file(filepath)?;
        log::debug!("Loaded configuration from {:?}: {:?}", filepath, config);
        Ok(config)
    }

    /// Reads `filepath` when given, defaults otherwise.
    pub fn load(filepath: Option<&Path>) -> Result<Self, LoadError> {
        match filepath {
            Some(filepath) => AppConfig::from_json_file(filepath),
            None => Ok(AppConfig::default()),
        }
    }
}
