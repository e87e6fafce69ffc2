use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::object_detection::coordinate_mapper::CoordinateMapper;
use crate::object_detection::label_lookup::{LabelLookup, UNKNOWN_LABEL};
use crate::object_detection::object_detection_utils::non_maximum_suppression;
use crate::object_detection::tensor_decoder::{
    MalformedTensorError, TensorShape, decode_output_tensor,
};
use serde::{Deserialize, Serialize};

/// Tuning for the post-processing of the detector output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Side of the square image the model was fed, in pixels.
    pub input_size: u32,
    /// Predictions must score strictly above this to be kept.
    pub confidence_threshold: f32,
    /// Same-label boxes overlapping more than this are duplicates.
    pub iou_threshold: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            input_size: 640,
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
        }
    }
}

/// Turns a raw YOLO output tensor into labeled, deduplicated boxes in source image pixels.
///
/// The pipeline holds only its configuration, so one instance can serve any number of
/// threads.
#[derive(Clone, Debug, Default)]
pub struct DetectionPipeline {
    config: DetectionConfig,
}

impl DetectionPipeline {
    pub fn new(config: DetectionConfig) -> Self {
        DetectionPipeline { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Decodes, rescales and suppresses. The result is sorted by descending confidence.
    pub fn detect<L: LabelLookup + ?Sized>(
        &self,
        tensor: &[f32],
        shape: TensorShape,
        source_width: u32,
        source_height: u32,
        labels: &L,
    ) -> Result<Vec<Detection<BoundingBox>>, MalformedTensorError> {
        let candidates = decode_output_tensor(tensor, shape, self.config.confidence_threshold)?;
        log::debug!(
            "{} of {} predictions above confidence {}",
            candidates.len(),
            shape.predictions,
            self.config.confidence_threshold
        );

        let mapper = CoordinateMapper::new(self.config.input_size, source_width, source_height);
        let mut unknown_class_ids: Vec<usize> = Vec::new();
        let mut detections: Vec<Detection<BoundingBox>> = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let label = match labels.label(candidate.class_id) {
                Some(label) => label,
                None => {
                    if !unknown_class_ids.contains(&candidate.class_id) {
                        unknown_class_ids.push(candidate.class_id);
                    }
                    UNKNOWN_LABEL
                }
            };
            if let Some(annotation) = mapper.map(candidate, label.to_string()) {
                detections.push(Detection {
                    annotation,
                    confidence: candidate.score,
                });
            }
        }
        if !unknown_class_ids.is_empty() {
            log::warn!(
                "Class ids {:?} have no label, reporting them as {:?}",
                unknown_class_ids,
                UNKNOWN_LABEL
            );
        }
        log::debug!("{} boxes left after mapping to source image", detections.len());

        let detections = non_maximum_suppression(detections, self.config.iou_threshold);
        log::debug!("{} detections survived non maximum suppression", detections.len());
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::bounding_box::BoundingBoxGeometry;
    use approx::assert_relative_eq;

    /// Channel-major buffer for the given per-prediction rows `[cx, cy, w, h, scores...]`.
    fn tensor_from_predictions(rows: &[Vec<f32>]) -> (Vec<f32>, TensorShape) {
        let features = rows[0].len();
        let tensor = (0..features)
            .flat_map(|feature| rows.iter().map(move |row| row[feature]))
            .collect();
        (tensor, TensorShape::new(features, rows.len()))
    }

    fn labels() -> Vec<String> {
        vec!["aphid".to_string(), "whitefly".to_string()]
    }

    #[test]
    fn detects_and_deduplicates() {
        let (tensor, shape) = tensor_from_predictions(&[
            // two overlapping aphids, the second one less confident
            vec![100.0, 100.0, 40.0, 40.0, 0.9, 0.1],
            vec![104.0, 100.0, 40.0, 40.0, 0.7, 0.1],
            // a whitefly on the same spot is kept, suppression is per label
            vec![102.0, 100.0, 40.0, 40.0, 0.2, 0.6],
            // below the confidence threshold
            vec![400.0, 400.0, 40.0, 40.0, 0.2, 0.1],
        ]);
        let pipeline = DetectionPipeline::default();
        let detections = pipeline.detect(&tensor, shape, 640, 640, &labels()).unwrap();
        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].label(), "aphid");
        assert_relative_eq!(detections[0].confidence, 0.9);
        assert_eq!(detections[0].annotation.as_xyxy(), (80.0, 80.0, 120.0, 120.0));
        assert_eq!(detections[1].label(), "whitefly");
    }

    #[test]
    fn rescales_to_the_source_image() {
        let (tensor, shape) = tensor_from_predictions(&[vec![320.0, 320.0, 64.0, 64.0, 0.8, 0.0]]);
        let pipeline = DetectionPipeline::default();
        let detections = pipeline.detect(&tensor, shape, 1920, 1080, &labels()).unwrap();
        assert_eq!(detections.len(), 1);
        let (left, top, right, bottom) = detections[0].annotation.as_xyxy();
        assert_relative_eq!(left, 864.0, epsilon = 1e-3);
        assert_relative_eq!(right, 1056.0, epsilon = 1e-3);
        assert_relative_eq!(top, 486.0, epsilon = 1e-3);
        assert_relative_eq!(bottom, 594.0, epsilon = 1e-3);
    }

    #[test]
    fn unknown_class_id_gets_sentinel_label() {
        let (tensor, shape) =
            tensor_from_predictions(&[vec![100.0, 100.0, 20.0, 20.0, 0.1, 0.1, 0.95]]);
        let pipeline = DetectionPipeline::default();
        let detections = pipeline.detect(&tensor, shape, 640, 640, &labels()).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label(), UNKNOWN_LABEL);
    }

    #[test]
    fn respects_configured_thresholds() {
        let (tensor, shape) = tensor_from_predictions(&[
            vec![100.0, 100.0, 40.0, 40.0, 0.9, 0.0],
            vec![104.0, 100.0, 40.0, 40.0, 0.7, 0.0],
            vec![300.0, 300.0, 40.0, 40.0, 0.4, 0.0],
        ]);
        let pipeline = DetectionPipeline::new(DetectionConfig {
            input_size: 640,
            confidence_threshold: 0.5,
            iou_threshold: 0.95,
        });
        let detections = pipeline.detect(&tensor, shape, 640, 640, &labels()).unwrap();
        let confidences: Vec<f32> = detections.iter().map(|d| d.confidence).collect();
        assert_eq!(confidences, vec![0.9, 0.7]);
        assert!(detections.iter().all(|d| d.confidence > 0.5));
    }

    #[test]
    fn malformed_tensor_is_an_error() {
        let pipeline = DetectionPipeline::default();
        assert!(matches!(
            pipeline.detect(&[0.0; 10], TensorShape::new(6, 2), 640, 640, &labels()),
            Err(MalformedTensorError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn boxes_outside_the_image_are_dropped() {
        let (tensor, shape) = tensor_from_predictions(&[vec![-50.0, -50.0, 20.0, 20.0, 0.9, 0.0]]);
        let pipeline = DetectionPipeline::default();
        assert!(pipeline.detect(&tensor, shape, 640, 640, &labels()).unwrap().is_empty());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: DetectionConfig = serde_json::from_str(r#"{"iou_threshold": 0.6}"#).unwrap();
        assert_eq!(config.input_size, 640);
        assert_relative_eq!(config.confidence_threshold, 0.25);
        assert_relative_eq!(config.iou_threshold, 0.6);
    }
}
