use proto3d_core::obj::{parse_obj, read_obj, to_obj_string, write_obj};
use proto3d_core::primitives::{cylinder, icosphere, torus};
use proto3d_core::MeshError;

#[test]
fn export_then_load_preserves_counts() {
    let dir = tempfile::tempdir().unwrap();
    for mesh in [icosphere(0.5, 3), torus(0.5, 0.2, 48, 24), cylinder(0.3, 1.0, 32)] {
        let path = dir.path().join("model.obj");
        write_obj(&mesh, &path).unwrap();
        let loaded = read_obj(&path).unwrap();
        assert_eq!(mesh.vertex_count(), loaded.vertex_count());
        assert_eq!(mesh.face_count(), loaded.face_count());
        assert_eq!(mesh.faces, loaded.faces);
    }
}

#[test]
fn write_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out").join("model.obj");
    write_obj(&cylinder(1.0, 1.0, 8), &path).unwrap();
    assert!(path.is_file());
}

#[test]
fn text_lists_vertices_before_one_based_faces() {
    let text = to_obj_string(&cylinder(1.0, 2.0, 3));
    let lines: Vec<&str> = text.lines().collect();
    let first_face = lines.iter().position(|l| l.starts_with("f ")).unwrap();
    let last_vertex = lines.iter().rposition(|l| l.starts_with("v ")).unwrap();
    assert!(last_vertex < first_face);
    assert!(lines.iter().filter(|l| l.starts_with("f ")).all(|l| !l.contains(" 0")));
}

#[test]
fn parses_quads_texture_indices_and_comments() {
    let text = "\
# a unit square
o square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1  # quad
";
    let mesh = parse_obj(text).unwrap();
    assert_eq!(4, mesh.vertex_count());
    assert_eq!(vec![[0, 1, 2], [0, 2, 3]], mesh.faces);
}

#[test]
fn reports_line_of_bad_index() {
    let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 9\n";
    match parse_obj(text) {
        Err(MeshError::Parse { line, .. }) => assert_eq!(4, line),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_obj(&dir.path().join("nope.obj")).unwrap_err();
    assert!(matches!(err, MeshError::Io { .. }));
}
