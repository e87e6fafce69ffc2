use crate::annotations::bounding_box::BoundingBox;
use crate::object_detection::tensor_decoder::RawBoxCandidate;

/// Maps boxes from the square model input back onto the source image.
///
/// The image is stretched to `input_size x input_size` before inference (no letterboxing),
/// so the x and y axes are scaled independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    input_size: f32,
    source_width: f32,
    source_height: f32,
}

impl CoordinateMapper {
    pub fn new(input_size: u32, source_width: u32, source_height: u32) -> Self {
        CoordinateMapper {
            input_size: input_size as f32,
            source_width: source_width as f32,
            source_height: source_height as f32,
        }
    }

    /// Converts a center/size box into a clamped left/top/right/bottom box in source pixels.
    ///
    /// Returns `None` when the clamped box has no width or no height.
    pub fn map(&self, candidate: &RawBoxCandidate, category: String) -> Option<BoundingBox> {
        if self.input_size <= 0.0 {
            return None;
        }
        let scale_x = self.source_width / self.input_size;
        let scale_y = self.source_height / self.input_size;
        let half_width = candidate.width / 2.0;
        let half_height = candidate.height / 2.0;

        let left = clamp((candidate.center_x - half_width) * scale_x, self.source_width);
        let top = clamp((candidate.center_y - half_height) * scale_y, self.source_height);
        let right = clamp((candidate.center_x + half_width) * scale_x, self.source_width);
        let bottom = clamp((candidate.center_y + half_height) * scale_y, self.source_height);

        if right - left <= 0.0 || bottom - top <= 0.0 {
            return None;
        }
        BoundingBox::new(left, top, right, bottom, category).ok()
    }
}

fn clamp(value: f32, upper: f32) -> f32 {
    value.max(0.0).min(upper)
}
