//! Parametric solids. Every constructor returns an outward-wound, indexed
//! triangle mesh centred on the origin unless noted otherwise.

use crate::mesh::Mesh;
use nalgebra::Point3;
use std::collections::HashMap;
use std::f64::consts::TAU;

pub const DEFAULT_SECTIONS: u32 = 32;
pub const ICOSPHERE_SUBDIVISIONS: u32 = 3;

/// Axis-aligned box with the given full extents.
pub fn cuboid(ex: f64, ey: f64, ez: f64) -> Mesh {
    let (hx, hy, hz) = (ex * 0.5, ey * 0.5, ez * 0.5);
    // index bits: x | y << 1 | z << 2
    let vertices = (0..8)
        .map(|i| {
            Point3::new(
                if i & 1 == 0 { -hx } else { hx },
                if i & 2 == 0 { -hy } else { hy },
                if i & 4 == 0 { -hz } else { hz },
            )
        })
        .collect();
    let faces = vec![
        [0, 2, 3],
        [0, 3, 1],
        [4, 5, 7],
        [4, 7, 6],
        [0, 1, 5],
        [0, 5, 4],
        [2, 6, 7],
        [2, 7, 3],
        [0, 4, 6],
        [0, 6, 2],
        [1, 3, 7],
        [1, 7, 5],
    ];
    Mesh::new(vertices, faces)
}

pub fn cube(extent: f64) -> Mesh {
    cuboid(extent, extent, extent)
}

fn ring(radius: f64, z: f64, sections: u32) -> impl Iterator<Item = Point3<f64>> {
    (0..sections).map(move |i| {
        let a = TAU * i as f64 / sections as f64;
        Point3::new(radius * a.cos(), radius * a.sin(), z)
    })
}

/// Capped cylinder along Z, centred on the origin.
pub fn cylinder(radius: f64, height: f64, sections: u32) -> Mesh {
    let n = sections;
    let half = height * 0.5;
    let mut mesh = Mesh::with_capacity(2 * n as usize + 2, 4 * n as usize);
    let bottom_center = mesh.add_vertex(Point3::new(0.0, 0.0, -half));
    let top_center = mesh.add_vertex(Point3::new(0.0, 0.0, half));
    mesh.vertices.extend(ring(radius, -half, n));
    mesh.vertices.extend(ring(radius, half, n));

    let b = |i: u32| 2 + i % n;
    let t = |i: u32| 2 + n + i % n;
    for i in 0..n {
        mesh.add_face(bottom_center, b(i + 1), b(i));
        mesh.add_face(top_center, t(i), t(i + 1));
        mesh.add_face(b(i), b(i + 1), t(i + 1));
        mesh.add_face(b(i), t(i + 1), t(i));
    }
    mesh
}

/// Cone with its base disc at z = 0 and apex at z = height.
pub fn cone(radius: f64, height: f64, sections: u32) -> Mesh {
    let n = sections;
    let mut mesh = Mesh::with_capacity(n as usize + 2, 2 * n as usize);
    let base_center = mesh.add_vertex(Point3::origin());
    let apex = mesh.add_vertex(Point3::new(0.0, 0.0, height));
    mesh.vertices.extend(ring(radius, 0.0, n));

    let r = |i: u32| 2 + i % n;
    for i in 0..n {
        mesh.add_face(base_center, r(i + 1), r(i));
        mesh.add_face(r(i), r(i + 1), apex);
    }
    mesh
}

pub fn torus(major_radius: f64, tube_radius: f64, major_segments: u32, minor_segments: u32) -> Mesh {
    let (big, small) = (major_segments, minor_segments);
    let mut mesh = Mesh::with_capacity((big * small) as usize, (2 * big * small) as usize);
    for i in 0..big {
        let phi = TAU * i as f64 / big as f64;
        for j in 0..small {
            let theta = TAU * j as f64 / small as f64;
            let r = major_radius + tube_radius * theta.cos();
            mesh.add_vertex(Point3::new(r * phi.cos(), r * phi.sin(), tube_radius * theta.sin()));
        }
    }

    let idx = |i: u32, j: u32| (i % big) * small + j % small;
    for i in 0..big {
        for j in 0..small {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            mesh.add_face(a, b, c);
            mesh.add_face(a, c, d);
        }
    }
    mesh
}

/// Ring solid: the rectangle `[r_min, r_max] x [-height/2, height/2]`
/// revolved around Z.
///
/// The profile is revolved exactly as given. With `r_max < r_min` the faces
/// end up wound inward, and a zero radius collapses a whole ring of vertices
/// onto the axis.
pub fn annulus(r_min: f64, r_max: f64, height: f64, sections: u32) -> Mesh {
    let half = height * 0.5;
    let profile = [(r_min, -half), (r_max, -half), (r_max, half), (r_min, half)];
    let n = sections;
    let p = profile.len() as u32;

    let mut mesh = Mesh::with_capacity((p * n) as usize, (2 * p * n) as usize);
    for &(radius, z) in &profile {
        mesh.vertices.extend(ring(radius.abs(), z, n));
    }

    let idx = |k: u32, i: u32| (k % p) * n + i % n;
    for k in 0..p {
        for i in 0..n {
            let (a, b, c, d) = (idx(k, i), idx(k, i + 1), idx(k + 1, i + 1), idx(k + 1, i));
            mesh.add_face(a, b, c);
            mesh.add_face(a, c, d);
        }
    }
    mesh
}

/// Geodesic sphere from a subdivided icosahedron.
pub fn icosphere(radius: f64, subdivisions: u32) -> Mesh {
    let t = (1.0 + 5f64.sqrt()) / 2.0;
    let mut vertices: Vec<Point3<f64>> = [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .iter()
    .map(|&(x, y, z)| Point3::from(nalgebra::Vector3::new(x, y, z).normalize()))
    .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, vertices: &mut Vec<Point3<f64>>| -> u32 {
            let key = if a < b { (a, b) } else { (b, a) };
            *midpoints.entry(key).or_insert_with(|| {
                let m = nalgebra::center(&vertices[a as usize], &vertices[b as usize]);
                vertices.push(Point3::from(m.coords.normalize()));
                (vertices.len() - 1) as u32
            })
        };

        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[a, b, c] in &faces {
            let ab = midpoint(a, b, &mut vertices);
            let bc = midpoint(b, c, &mut vertices);
            let ca = midpoint(c, a, &mut vertices);
            next.push([a, ab, ca]);
            next.push([b, bc, ab]);
            next.push([c, ca, bc]);
            next.push([ab, bc, ca]);
        }
        faces = next;
    }

    for v in &mut vertices {
        *v = Point3::from(v.coords * radius);
    }
    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_closed_and_evenly_spaced() {
        let pts: Vec<_> = ring(1.0, 0.0, 4).collect();
        assert_eq!(4, pts.len());
        assert!((pts[1].y - 1.0).abs() < 1e-12);
        assert!((pts[2].x + 1.0).abs() < 1e-12);
    }
}
