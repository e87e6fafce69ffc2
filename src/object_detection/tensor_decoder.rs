use ndarray::{ArrayView2, Axis, s};
use thiserror::Error;

/// Number of leading rows in the output tensor that hold box geometry (cx, cy, w, h).
pub const BOX_COORDINATE_ROWS: usize = 4;

/// Raised when the detector output cannot be interpreted as a YOLO style prediction tensor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedTensorError {
    #[error("Tensor shape must have at least 2 dimensions, got {rank}.")]
    MissingDimensions { rank: usize },
    #[error(
        "Tensor has {features} features per prediction, at least 5 are needed (4 box \
        coordinates and one class)."
    )]
    TooFewFeatures { features: usize },
    #[error("Tensor shape {features}x{predictions} is too large to address.")]
    ShapeOverflow { features: usize, predictions: usize },
    #[error("Tensor buffer holds {actual} values but shape {features}x{predictions} needs {expected}.")]
    LengthMismatch {
        features: usize,
        predictions: usize,
        expected: usize,
        actual: usize,
    },
}

/// The last two dimensions of the detector output: `(features, predictions)`.
///
/// YOLO11 exports produce `[1, 4 + num_classes, num_predictions]`; the batch axis is
/// irrelevant to decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorShape {
    pub features: usize,
    pub predictions: usize,
}

impl TensorShape {
    pub fn new(features: usize, predictions: usize) -> Self {
        TensorShape {
            features,
            predictions,
        }
    }

    /// Builds the shape from the full tensor dimensions, keeping only the last two.
    pub fn from_dims(dims: &[usize]) -> Result<Self, MalformedTensorError> {
        match dims {
            [.., features, predictions] => Ok(TensorShape::new(*features, *predictions)),
            _ => Err(MalformedTensorError::MissingDimensions { rank: dims.len() }),
        }
    }

    pub fn num_classes(&self) -> usize {
        self.features.saturating_sub(BOX_COORDINATE_ROWS)
    }
}

/// A box straight out of the model, still in model input space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawBoxCandidate {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub class_id: usize,
    pub score: f32,
}

/// Views the flat, channel-major output buffer as a `features x predictions` matrix.
pub fn view_output_tensor(
    tensor: &[f32],
    shape: TensorShape,
) -> Result<ArrayView2<'_, f32>, MalformedTensorError> {
    if shape.features <= BOX_COORDINATE_ROWS {
        return Err(MalformedTensorError::TooFewFeatures {
            features: shape.features,
        });
    }
    let expected = shape
        .features
        .checked_mul(shape.predictions)
        .ok_or(MalformedTensorError::ShapeOverflow {
            features: shape.features,
            predictions: shape.predictions,
        })?;
    if tensor.len() != expected {
        return Err(MalformedTensorError::LengthMismatch {
            features: shape.features,
            predictions: shape.predictions,
            expected,
            actual: tensor.len(),
        });
    }
    ArrayView2::from_shape((shape.features, shape.predictions), tensor).map_err(|_| {
        MalformedTensorError::LengthMismatch {
            features: shape.features,
            predictions: shape.predictions,
            expected,
            actual: tensor.len(),
        }
    })
}

/// Decodes every prediction whose best class score is strictly above `confidence`.
///
/// Row `r`, column `i` of the viewed matrix is the value at `r * predictions + i` in the flat
/// buffer, so rows 0..4 are the geometry and rows 4.. are the per-class scores.
pub fn decode_output_tensor(
    tensor: &[f32],
    shape: TensorShape,
    confidence: f32,
) -> Result<Vec<RawBoxCandidate>, MalformedTensorError> {
    let output = view_output_tensor(tensor, shape)?;
    let class_scores = output.slice(s![BOX_COORDINATE_ROWS.., ..]);
    let mut candidates: Vec<RawBoxCandidate> = Vec::new();
    for (prediction, scores) in class_scores.axis_iter(Axis(1)).enumerate() {
        // NaN never compares greater than the seed, so it cannot win.
        let (class_id, score) = scores.iter().copied().enumerate().fold(
            (0, f32::NEG_INFINITY),
            |accum, entry| if entry.1 > accum.1 { entry } else { accum },
        );
        if score <= confidence {
            continue;
        }
        candidates.push(RawBoxCandidate {
            center_x: output[[0, prediction]],
            center_y: output[[1, prediction]],
            width: output[[2, prediction]],
            height: output[[3, prediction]],
            class_id,
            score,
        });
    }
    Ok(candidates)
}
