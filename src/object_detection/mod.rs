pub mod coordinate_mapper;
pub mod detection_pipeline;
pub mod label_lookup;
pub mod object_detection_utils;
pub mod tensor_decoder;
