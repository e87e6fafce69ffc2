use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Returned when a box would be constructed with its edges inverted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundingBoxError {
    #[error("Failed to create BoundingBox, value for left > value for right ({left} > {right}).")]
    LeftExceedsRight { left: f32, right: f32 },
    #[error("Failed to create BoundingBox, value for top > value for bottom ({top} > {bottom}).")]
    TopExceedsBottom { top: f32, bottom: f32 },
}

/// A struct representing a bounding box.
///
/// A bounding box is the rectangle an object detection model places around an object it
/// found in an image, together with a category naming what that object is. When the
/// detector runs, it outputs bounding boxes along with a probability encoding its
/// confidence in that box+category.
///
/// This project uses the standard convention of the left side of the image being x=0 and the top
/// of the image being y=0.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BoundingBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    category: String,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        category: String,
    ) -> Result<Self, BoundingBoxError> {
        if left > right {
            Err(BoundingBoxError::LeftExceedsRight { left, right })
        } else if top > bottom {
            Err(BoundingBoxError::TopExceedsBottom { top, bottom })
        } else {
            Ok(BoundingBox {
                left,
                top,
                right,
                bottom,
                category,
            })
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundingBox {{ category: {}, left: {}, top: {}, right: {}, bottom: {} }}",
            self.category, self.left, self.top, self.right, self.bottom
        )
    }
}

/// Geometry shared by every annotation that is, at its core, an axis aligned box.
pub trait BoundingBoxGeometry {
    fn left(&self) -> f32;
    fn top(&self) -> f32;
    fn right(&self) -> f32;
    fn bottom(&self) -> f32;
    fn category(&self) -> &str;

    fn width(&self) -> f32 {
        self.right() - self.left()
    }

    fn height(&self) -> f32 {
        self.bottom() - self.top()
    }

    fn area(&self) -> f32 {
        self.width() * self.height()
    }

    fn center(&self) -> (f32, f32) {
        (
            (self.left() + self.right()) / 2.0,
            (self.top() + self.bottom()) / 2.0,
        )
    }

    fn as_xyxy(&self) -> (f32, f32, f32, f32) {
        (self.left(), self.top(), self.right(), self.bottom())
    }

    fn intersection_area<U: BoundingBoxGeometry + ?Sized>(&self, other: &U) -> f32 {
        let width = (self.right().min(other.right()) - self.left().max(other.left())).max(0.0);
        let height = (self.bottom().min(other.bottom()) - self.top().max(other.top())).max(0.0);
        width * height
    }

    /// Intersection area over union area. Defined as 0 when the union is empty.
    fn intersection_over_union<U: BoundingBoxGeometry + ?Sized>(&self, other: &U) -> f32 {
        let intersection = self.intersection_area(other);
        let union = self.area() + other.area() - intersection;
        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f32 {
        self.left
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn right(&self) -> f32 {
        self.right
    }

    fn bottom(&self) -> f32 {
        self.bottom
    }

    fn category(&self) -> &str {
        &self.category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_inverted_box() {
        assert_eq!(
            BoundingBox::new(2.0, 0.0, 1.0, 1.0, "aphid".to_string()),
            Err(BoundingBoxError::LeftExceedsRight {
                left: 2.0,
                right: 1.0
            })
        );
        assert!(matches!(
            BoundingBox::new(0.0, 3.0, 1.0, 1.0, "aphid".to_string()),
            Err(BoundingBoxError::TopExceedsBottom { .. })
        ));
    }

    #[test]
    fn zero_sized_box_is_allowed() {
        let bbox = BoundingBox::new(1.0, 1.0, 1.0, 1.0, "aphid".to_string()).unwrap();
        assert_eq!(bbox.area(), 0.0);
    }

    #[test]
    fn iou_of_partial_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 2.0, 2.0, "aphid".to_string()).unwrap();
        let b = BoundingBox::new(1.0, 0.0, 3.0, 2.0, "aphid".to_string()).unwrap();
        // intersection 2, union 6
        assert_relative_eq!(a.intersection_over_union(&b), 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(b.intersection_over_union(&a), 1.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn iou_of_disjoint_and_identical_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0, "aphid".to_string()).unwrap();
        let b = BoundingBox::new(5.0, 5.0, 6.0, 6.0, "aphid".to_string()).unwrap();
        assert_eq!(a.intersection_over_union(&b), 0.0);
        assert_relative_eq!(a.intersection_over_union(&a), 1.0);
    }

    #[test]
    fn iou_with_empty_union_is_zero() {
        let a = BoundingBox::new(1.0, 1.0, 1.0, 1.0, "aphid".to_string()).unwrap();
        assert_eq!(a.intersection_over_union(&a), 0.0);
    }

    #[test]
    fn center_and_xyxy() {
        let a = BoundingBox::new(2.0, 4.0, 6.0, 10.0, "whitefly".to_string()).unwrap();
        assert_eq!(a.center(), (4.0, 7.0));
        assert_eq!(a.as_xyxy(), (2.0, 4.0, 6.0, 10.0));
        assert_eq!(a.category(), "whitefly");
    }
}
