//! Pest identification core.
//!
//! Two independent pieces:
//!
//! 1. **Detection post-processing** ([`object_detection`]): decodes a YOLO output tensor,
//!    maps boxes back onto the source image and removes same-label duplicates with
//!    non maximum suppression.
//! 2. **Diagnosis** ([`diagnosis`]): a "20 questions" loop that keeps a probability
//!    distribution over candidate pests, asks the yes/no question with the lowest expected
//!    posterior entropy and applies Bayes' rule to each answer.
//!
//! Running the detector, loading images and drawing a UI are left to the caller.

pub mod annotations;
pub mod config;
pub mod data_io;
pub mod diagnosis;
pub mod object_detection;

pub use annotations::bounding_box::{BoundingBox, BoundingBoxGeometry};
pub use annotations::detection::Detection;
pub use config::AppConfig;
pub use diagnosis::candidate::Candidate;
pub use diagnosis::diagnosis_session::{
    DiagnosisOutcome, DiagnosisSession, NextQuestion, SessionError,
};
pub use diagnosis::question_catalog::{Question, QuestionCatalog};
pub use diagnosis::session_registry::{SessionId, SessionRegistry};
pub use diagnosis::stopping_policy::StoppingPolicy;
pub use object_detection::detection_pipeline::{DetectionConfig, DetectionPipeline};
pub use object_detection::label_lookup::{LabelAliases, LabelLookup};
pub use object_detection::tensor_decoder::{MalformedTensorError, TensorShape};
