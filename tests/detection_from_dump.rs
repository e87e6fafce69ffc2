use pest_identifier::data_io::table_io::{read_label_aliases_json, read_labels_txt_file};
use pest_identifier::data_io::tensor_io::read_tensor_json;
use pest_identifier::{BoundingBoxGeometry, DetectionPipeline};
use std::path::Path;

#[test]
fn detects_bundled_tensor() {
    let labels = read_labels_txt_file(Path::new("./data/model_metadata/labels.txt")).unwrap();
    let aliases = read_label_aliases_json(Path::new("./data/tables/label_aliases.json")).unwrap();
    let dump = read_tensor_json(Path::new("./data/test_data/tensor.json")).unwrap();

    let pipeline = DetectionPipeline::default();
    let detections = pipeline
        .detect(&dump.data, dump.tensor_shape().unwrap(), 1280, 640, &labels)
        .unwrap();

    assert_eq!(detections.len(), 2);
    assert_eq!(detections[0].label(), "fall armyworm");
    assert_eq!(aliases.resolve(detections[0].label()), "fall_armyworm");
    assert_eq!(detections[0].annotation.as_xyxy(), (160.0, 80.0, 240.0, 120.0));
    assert_eq!(detections[1].label(), "aphid");
    assert_eq!(detections[1].annotation.as_xyxy(), (560.0, 280.0, 640.0, 320.0));
    assert!(detections[0].confidence > detections[1].confidence);
}
