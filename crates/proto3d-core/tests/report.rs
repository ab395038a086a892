use proto3d_core::primitives::cube;
use proto3d_core::report::ModelReport;
use proto3d_core::Mesh;
use std::path::PathBuf;

#[test]
fn report_serializes_stats_and_warnings() {
    let mut report = ModelReport::new("text", "a red cube", "cube", PathBuf::from("outputs/model.obj"), &cube(1.0));
    report.size = Some(1.0);
    report.warn("random_shape", "no keyword matched");

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!("text", value["input_type"]);
    assert_eq!(8, value["mesh"]["vertex_count"]);
    assert_eq!(12, value["mesh"]["face_count"]);
    assert_eq!(-0.5, value["mesh"]["bbox"]["min"][0]);
    assert_eq!("random_shape", value["warnings"][0]["code"]);

    let back: ModelReport = serde_json::from_value(value).unwrap();
    assert_eq!(report.generated_at, back.generated_at);
}

#[test]
fn empty_mesh_has_no_bbox() {
    let report = ModelReport::new("image", "x.png", "fallback_cube", PathBuf::from("m.obj"), &Mesh::default());
    assert!(report.mesh.bbox.is_none());
}
