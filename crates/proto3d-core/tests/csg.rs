use nalgebra::Vector3;
use proto3d_core::csg::difference;
use proto3d_core::primitives::{cube, cylinder};
use proto3d_core::{Mesh, MeshError};

#[test]
fn subtracting_a_smaller_box_hollows_the_solid() {
    let outer = cube(1.0);
    let inner = cube(0.5).translated(Vector3::new(0.0, 0.0, 0.4));
    let result = difference(&outer, &inner).unwrap();
    result.validate().unwrap();
    // the inner box pokes through the top face: 1 - 0.5 * 0.5 * 0.35
    let expected = 1.0 - 0.25 * 0.35;
    assert!(
        (result.signed_volume() - expected).abs() < 1e-9,
        "volume {}",
        result.signed_volume()
    );
}

#[test]
fn hollow_cup_keeps_a_floor() {
    let body = cylinder(0.3, 0.5, 32);
    let inner = cylinder(0.25, 0.45, 32).translated(Vector3::new(0.0, 0.0, 0.025));
    let cup = difference(&body, &inner).unwrap();
    cup.validate().unwrap();
    assert!(!cup.faces.is_empty());

    let expected = body.signed_volume() - inner.signed_volume();
    assert!((cup.signed_volume() - expected).abs() < 1e-6);

    let bbox = cup.bbox();
    assert!((bbox.min.z + 0.25).abs() < 1e-9);
    assert!((bbox.max.z - 0.25).abs() < 1e-9);
}

#[test]
fn disjoint_subtrahend_leaves_volume_unchanged() {
    let a = cube(1.0);
    let b = cube(1.0).translated(Vector3::new(5.0, 0.0, 0.0));
    let result = difference(&a, &b).unwrap();
    assert!((result.signed_volume() - 1.0).abs() < 1e-9);
}

/// Undirected edges used by exactly one triangle.
fn open_edges(mesh: &Mesh) -> usize {
    let mut uses = std::collections::HashMap::new();
    for f in &mesh.faces {
        for (a, b) in [(f[0], f[1]), (f[1], f[2]), (f[2], f[0])] {
            *uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }
    uses.values().filter(|&&n| n == 1).count()
}

#[test]
fn unsplit_operand_stays_closed() {
    let result = difference(&cube(1.0), &cube(1.0).translated(Vector3::new(5.0, 0.0, 0.0))).unwrap();
    assert_eq!(8, result.vertex_count());
    assert_eq!(0, open_edges(&result));
}

#[test]
fn split_faces_keep_exact_volume_but_leave_open_edges() {
    let body = cylinder(0.3, 0.5, 32);
    let inner = cylinder(0.25, 0.45, 32).translated(Vector3::new(0.0, 0.0, 0.025));
    let cup = difference(&body, &inner).unwrap();
    assert!(open_edges(&cup) > 0);
    assert!((cup.signed_volume() - (body.signed_volume() - inner.signed_volume())).abs() < 1e-6);
}

#[test]
fn subtracting_everything_is_an_error() {
    let a = cube(1.0);
    let b = cube(2.0);
    assert!(matches!(difference(&a, &b), Err(MeshError::Boolean(_))));
}

#[test]
fn empty_operand_is_an_error() {
    assert!(difference(&Mesh::default(), &cube(1.0)).is_err());
}
