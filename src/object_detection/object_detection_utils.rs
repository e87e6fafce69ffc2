use crate::annotations::bounding_box::BoundingBoxGeometry;
use crate::annotations::detection::Detection;

/// Non maxmimum suppression is a way of removing duplicate detections.
///
/// Detections are visited from most to least confident (ties keep their input order). A
/// detection survives unless an already surviving detection of the same category overlaps it
/// with an IoU above `iou_threshold`. Boxes of different categories never suppress each other.
pub fn non_maximum_suppression<T: BoundingBoxGeometry>(
    mut detections: Vec<Detection<T>>,
    iou_threshold: f32,
) -> Vec<Detection<T>> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut detections_to_remove: Vec<bool> = vec![false; detections.len()];
    for (current_index, current_det) in detections.iter().enumerate() {
        if detections_to_remove[current_index] {
            continue;
        }
        for (other_index, other_det) in detections[current_index + 1..].iter().enumerate() {
            let other_index = current_index + other_index + 1;
            if detections_to_remove[other_index] {
                continue;
            }
            if current_det.annotation.category() != other_det.annotation.category() {
                continue;
            }
            let iou = current_det
                .annotation
                .intersection_over_union(&other_det.annotation);
            if iou > iou_threshold {
                detections_to_remove[other_index] = true;
            }
        }
    }
    let mut drop_iter = detections_to_remove.into_iter();
    detections.retain(|_| !drop_iter.next().unwrap_or(false));
    detections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::bounding_box::BoundingBox;

    fn det(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        label: &str,
        confidence: f32,
    ) -> Detection<BoundingBox> {
        Detection {
            annotation: BoundingBox::new(left, top, right, bottom, label.to_string()).unwrap(),
            confidence,
        }
    }

    #[test]
    fn nms_no_overlap() {
        let dets = vec![
            det(0.0, 0.0, 1.0, 1.0, "test", 0.6),
            det(2.0, 2.0, 3.0, 3.0, "test", 0.6),
        ];
        let nms_result = non_maximum_suppression(dets.clone(), 0.5);
        assert_eq!(dets, nms_result);
    }

    #[test]
    fn nms_standard_usage() {
        let dets = vec![
            det(0.0, 0.0, 4.0, 4.0, "test", 0.6),
            det(0.0, 0.0, 5.0, 5.0, "test", 0.55),
            det(6.0, 6.0, 10.0, 10.0, "test", 0.75),
        ];
        let nms_result = non_maximum_suppression(dets, 0.5);
        let true_dets = vec![
            det(6.0, 6.0, 10.0, 10.0, "test", 0.75),
            det(0.0, 0.0, 4.0, 4.0, "test", 0.6),
        ];
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_overlap_but_different_classes() {
        let dets = vec![
            det(0.0, 0.0, 4.5, 4.5, "test", 0.6),
            det(0.0, 0.0, 5.0, 5.0, "test_different_class", 0.55),
            det(0.5, 0.5, 4.0, 4.0, "test", 0.8),
            det(6.0, 6.0, 10.0, 10.0, "test", 0.75),
        ];
        let nms_result = non_maximum_suppression(dets, 0.5);
        let true_dets = vec![
            det(0.5, 0.5, 4.0, 4.0, "test", 0.8),
            det(6.0, 6.0, 10.0, 10.0, "test", 0.75),
            det(0.0, 0.0, 5.0, 5.0, "test_different_class", 0.55),
        ];
        assert_eq!(true_dets, nms_result);
    }

    #[test]
    fn nms_keeps_more_confident_aphid() {
        // intersection 6 x 10 = 60, union 100 -> IoU 0.6
        let dets = vec![
            det(2.0, 0.0, 10.0, 10.0, "aphid", 0.7),
            det(0.0, 0.0, 8.0, 10.0, "aphid", 0.9),
        ];
        let nms_result = non_maximum_suppression(dets, 0.45);
        assert_eq!(nms_result, vec![det(0.0, 0.0, 8.0, 10.0, "aphid", 0.9)]);
    }

    #[test]
    fn suppressed_detection_does_not_suppress_others() {
        // b overlaps both a and c heavily, a and c only slightly. Once a removes b, c survives.
        let a = det(0.0, 0.0, 10.0, 10.0, "aphid", 0.9);
        let b = det(3.0, 0.0, 13.0, 10.0, "aphid", 0.8);
        let c = det(6.0, 0.0, 16.0, 10.0, "aphid", 0.7);
        let nms_result = non_maximum_suppression(vec![c.clone(), b, a.clone()], 0.45);
        assert_eq!(nms_result, vec![a, c]);
    }

    #[test]
    fn ties_keep_input_order() {
        let first = det(0.0, 0.0, 10.0, 10.0, "aphid", 0.8);
        let second = det(1.0, 0.0, 11.0, 10.0, "aphid", 0.8);
        let nms_result = non_maximum_suppression(vec![first.clone(), second], 0.45);
        assert_eq!(nms_result, vec![first]);
    }

    #[test]
    fn survivors_are_sorted_subset_without_same_label_overlap() {
        let dets = vec![
            det(0.0, 0.0, 10.0, 10.0, "aphid", 0.5),
            det(1.0, 1.0, 11.0, 11.0, "aphid", 0.65),
            det(2.0, 2.0, 12.0, 12.0, "whitefly", 0.3),
            det(20.0, 20.0, 30.0, 30.0, "aphid", 0.95),
            det(21.0, 20.0, 31.0, 30.0, "whitefly", 0.4),
            det(2.0, 1.0, 12.0, 11.0, "whitefly", 0.9),
        ];
        let threshold = 0.45;
        let nms_result = non_maximum_suppression(dets.clone(), threshold);
        assert!(nms_result.len() <= dets.len());
        assert!(nms_result.iter().all(|d| dets.contains(d)));
        assert!(
            nms_result
                .windows(2)
                .all(|pair| pair[0].confidence >= pair[1].confidence)
        );
        for (i, a) in nms_result.iter().enumerate() {
            for b in &nms_result[i + 1..] {
                if a.label() == b.label() {
                    assert!(a.annotation.intersection_over_union(&b.annotation) <= threshold);
                }
            }
        }
    }

    #[test]
    fn nms_of_nothing_is_nothing() {
        let dets: Vec<Detection<BoundingBox>> = Vec::new();
        assert!(non_maximum_suppression(dets, 0.45).is_empty());
    }
}
