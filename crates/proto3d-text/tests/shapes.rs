use proto3d_core::obj::read_obj;
use proto3d_text::assemble::{assemble, CAR, TABLE};
use proto3d_text::{build_shape, generate_from_text, Shape, ShapeDescriptor};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn desc(shape: Shape, size: f64) -> ShapeDescriptor {
    ShapeDescriptor {
        shape,
        size,
        random: false,
    }
}

#[test]
fn every_shape_builds_with_valid_indices() {
    for shape in Shape::ALL {
        for size in [0.5, 1.0, 2.0] {
            let mesh = build_shape(&desc(shape, size)).unwrap();
            assert!(!mesh.is_empty(), "{shape} at {size}");
            mesh.validate().unwrap();
        }
    }
}

#[test]
fn tiny_ball_is_a_quarter_radius_icosphere() {
    let mesh = build_shape(&desc(Shape::Sphere, 0.5)).unwrap();
    assert_eq!(642, mesh.vertex_count());
    assert_eq!(1280, mesh.face_count());
    for v in &mesh.vertices {
        assert!((v.coords.norm() - 0.25).abs() < 1e-12);
    }
}

#[test]
fn giant_cube_has_side_two() {
    let mesh = build_shape(&desc(Shape::Cube, 2.0)).unwrap();
    let ext = mesh.bbox().extents();
    assert!((ext.x - 2.0).abs() < 1e-12);
    assert!((ext.z - 2.0).abs() < 1e-12);
}

#[test]
fn cone_base_sits_at_zero() {
    let mesh = build_shape(&desc(Shape::Cone, 1.0)).unwrap();
    let bbox = mesh.bbox();
    assert!(bbox.min.z.abs() < 1e-12);
    assert!((bbox.max.z - 1.0).abs() < 1e-12);
    assert!((bbox.max.x - 0.5).abs() < 1e-12);
}

#[test]
fn composites_concatenate_without_welding() {
    let car = assemble(&CAR, 1.0);
    assert_eq!(2 * 8 + 4 * 66, car.vertex_count());
    assert_eq!(2 * 12 + 4 * 128, car.face_count());
    let bbox = car.bbox();
    assert!((bbox.max.z - 0.35).abs() < 1e-12);
    assert!((bbox.min.z + 0.175).abs() < 1e-12);
    assert!((bbox.max.x - 0.5).abs() < 1e-12);

    let table = assemble(&TABLE, 2.0);
    assert_eq!(8 + 4 * 66, table.vertex_count());
    let bbox = table.bbox();
    assert!((bbox.max.z - 1.1).abs() < 1e-12);
    assert!(bbox.min.z.abs() < 1e-12);
}

#[test]
fn mug_is_hollow_with_a_handle() {
    let mesh = build_shape(&desc(Shape::Mug, 1.0)).unwrap();
    assert!(!mesh.faces.is_empty());
    let bbox = mesh.bbox();
    assert!((bbox.min.z + 0.25).abs() < 1e-9);
    assert!((bbox.max.z - 0.3).abs() < 1e-9);
    // handle ring reaches out to x = 0.35
    assert!((bbox.max.x - 0.35).abs() < 1e-9);
}

#[test]
fn same_prompt_gives_identical_meshes() {
    for prompt in ["a small mug", "big red car", "glass bottle", "qwerty"] {
        let a = generate_mesh(prompt, 11);
        let b = generate_mesh(prompt, 11);
        assert_eq!(a, b, "{prompt}");
    }
}

fn generate_mesh(prompt: &str, seed: u64) -> proto3d_core::Mesh {
    let d = proto3d_text::extract_descriptor(prompt, &mut StdRng::seed_from_u64(seed));
    build_shape(&d).unwrap()
}

#[test]
fn generated_model_is_written_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("outputs");
    let model = generate_from_text("a large table", &out, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(out.join("model.obj"), model.model_path);
    assert_eq!(Shape::Table, model.descriptor.shape);
    assert_eq!(2.0, model.descriptor.size);

    let reloaded = read_obj(&model.model_path).unwrap();
    assert_eq!(model.mesh.vertex_count(), reloaded.vertex_count());
    assert_eq!(model.mesh.face_count(), reloaded.face_count());
}
