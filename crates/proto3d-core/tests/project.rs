use proto3d_core::primitives::{cube, cuboid, icosphere};
use proto3d_core::project::{project, to_viewport, viridis, Camera, Framing};

#[test]
fn framing_is_a_cube_around_the_midpoint() {
    let mut mesh = cuboid(2.0, 1.0, 0.5);
    mesh.translate(nalgebra::Vector3::new(1.0, 1.0, 1.0));
    let framing = Framing::of(&mesh);
    assert!((framing.half_extent - 1.0).abs() < 1e-12);
    assert!((framing.center - nalgebra::Point3::new(1.0, 1.0, 1.0)).norm() < 1e-12);

    let ext = framing.bounds().extents();
    assert_eq!(ext.x, ext.y);
    assert_eq!(ext.y, ext.z);
}

#[test]
fn projection_fits_the_unit_square_and_is_sorted_back_to_front() {
    let camera = Camera::default();
    let tris = project(&icosphere(3.0, 2), &camera);
    assert_eq!(320, tris.len());
    for t in &tris {
        for p in t.points {
            assert!(p[0].abs() <= 1.0 && p[1].abs() <= 1.0);
        }
    }
    assert!(tris.windows(2).all(|w| w[0].depth <= w[1].depth));
}

#[test]
fn orbit_clamps_elevation_and_wraps_azimuth() {
    let mut camera = Camera::default();
    camera.orbit(400.0, 200.0);
    assert!(camera.elevation_deg <= 89.0);
    assert!((0.0..360.0).contains(&camera.azimuth_deg));
    assert!((camera.eye().norm() - 1.0).abs() < 1e-12);
}

#[test]
fn viridis_endpoints() {
    assert_eq!([68, 1, 84], viridis(0.0));
    assert_eq!([253, 231, 37], viridis(1.0));
    assert_eq!(viridis(1.0), viridis(7.0));
    assert_eq!(viridis(0.0), viridis(f64::NAN));
}

#[test]
fn viewport_maps_origin_to_centre() {
    assert_eq!([50.0, 40.0], to_viewport([0.0, 0.0], 100.0, 80.0));
    let up = to_viewport([0.0, 1.0], 100.0, 80.0);
    assert!(up[1] < 40.0);
}

#[test]
fn flat_mesh_still_gets_colours() {
    let tris = project(&cube(1.0), &Camera::default());
    assert_eq!(12, tris.len());
}
