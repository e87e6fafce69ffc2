use crate::data_io::table_io::{LoadError, read_json_file};
use crate::object_detection::tensor_decoder::{MalformedTensorError, TensorShape};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A detector output dumped to disk: the tensor dimensions plus the flat values.
///
/// This is how the command line tool is handed inference results produced elsewhere.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TensorDump {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl TensorDump {
    pub fn tensor_shape(&self) -> Result<TensorShape, MalformedTensorError> {
        TensorShape::from_dims(&self.shape)
    }
}

pub fn read_tensor_json(filepath: &Path) -> Result<TensorDump, LoadError> {
    read_json_file(filepath)
}
