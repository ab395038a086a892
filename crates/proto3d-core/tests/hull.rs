use nalgebra::Point3;
use proto3d_core::hull::convex_hull;
use proto3d_core::MeshError;

fn unit_cube_corners() -> Vec<Point3<f64>> {
    (0..8)
        .map(|i| {
            Point3::new(
                (i & 1) as f64,
                ((i >> 1) & 1) as f64,
                ((i >> 2) & 1) as f64,
            )
        })
        .collect()
}

#[test]
fn tetrahedron_hull() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let mesh = convex_hull(&points).unwrap();
    assert_eq!(4, mesh.vertex_count());
    assert_eq!(4, mesh.face_count());
    assert!(mesh.signed_volume() > 0.0);
}

#[test]
fn interior_and_duplicate_points_are_ignored() {
    let mut points = unit_cube_corners();
    points.push(Point3::new(0.5, 0.5, 0.5));
    points.push(Point3::new(0.25, 0.75, 0.5));
    points.extend(unit_cube_corners());

    let mesh = convex_hull(&points).unwrap();
    mesh.validate().unwrap();
    assert_eq!(8, mesh.vertex_count());
    assert!((mesh.signed_volume() - 1.0).abs() < 1e-9);
}

#[test]
fn dense_cloud_hull_encloses_every_point() {
    // a lumpy grid in the shape the heightmap mesher produces
    let mut points = Vec::new();
    for row in 0..40 {
        for col in 0..40 {
            let x = col as f64 / 40.0 - 0.5;
            let y = (40 - row) as f64 / 40.0 - 0.5;
            let z = 0.1 * (1.0 - (x * x + y * y) * 2.0).max(0.0);
            points.push(Point3::new(x, y, z));
        }
    }

    let mesh = convex_hull(&points).unwrap();
    mesh.validate().unwrap();
    assert!(mesh.signed_volume() > 0.0);

    // every face plane has all input points on its inner side
    for face in &mesh.faces {
        let [a, _, _] = mesh.face_points(face);
        let n = mesh.face_normal(face);
        if n.norm() < 1e-15 {
            continue;
        }
        let n = n.normalize();
        for p in &points {
            assert!(n.dot(&(p - a)) <= 1e-9);
        }
    }
}

#[test]
fn coplanar_points_are_rejected() {
    let points: Vec<_> = (0..200)
        .map(|i| Point3::new((i % 20) as f64, (i / 20) as f64, 0.0))
        .collect();
    assert!(matches!(convex_hull(&points), Err(MeshError::Degenerate(_))));
}

#[test]
fn too_few_points_are_rejected() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ];
    assert!(convex_hull(&points).is_err());
}
