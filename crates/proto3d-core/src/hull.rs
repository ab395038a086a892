//! 3D convex hull (QuickHull).
//!
//! 1. Drop exact duplicates.
//! 2. Seed a tetrahedron from the axis-extreme points.
//! 3. Give every remaining point to one face it lies in front of.
//! 4. Repeatedly take the farthest outside point of some face, remove every
//!    face that point can see, and stitch the horizon to it.

use crate::error::{MeshError, Result};
use crate::geom::BBox3;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Relative to the extent of the input.
const RELATIVE_EPSILON: f64 = 1e-10;

pub fn convex_hull(points: &[Point3<f64>]) -> Result<Mesh> {
    let points = dedup(points);
    if points.len() < 4 {
        return Err(MeshError::degenerate(format!(
            "convex hull needs at least 4 distinct points, got {}",
            points.len()
        )));
    }

    let extent = BBox3::from_points(&points).extents().max();
    if !extent.is_finite() || extent <= 0.0 {
        return Err(MeshError::degenerate("point cloud has no extent"));
    }
    let eps = extent * RELATIVE_EPSILON;

    let (mut faces, interior) = initial_simplex(&points, eps)?;
    expand(&mut faces, &interior, &points, eps)?;
    Ok(to_mesh(&faces, &points))
}

#[derive(Debug, Clone)]
struct HullFace {
    vertices: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
    outside: Vec<usize>,
}

impl HullFace {
    fn new(a: usize, b: usize, c: usize, points: &[Point3<f64>]) -> Self {
        let normal = (points[b] - points[a])
            .cross(&(points[c] - points[a]))
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros);
        let offset = normal.dot(&points[a].coords);
        Self {
            vertices: [a, b, c],
            normal,
            offset,
            outside: Vec::new(),
        }
    }

    /// Winds the face so its normal points away from `interior`.
    fn facing_away(a: usize, b: usize, c: usize, interior: &Point3<f64>, points: &[Point3<f64>]) -> Self {
        let face = Self::new(a, b, c, points);
        if face.distance(interior) > 0.0 {
            Self::new(a, c, b, points)
        } else {
            face
        }
    }

    fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    fn farthest_outside(&self, points: &[Point3<f64>]) -> Option<usize> {
        self.outside.iter().copied().max_by(|&a, &b| {
            self.distance(&points[a])
                .partial_cmp(&self.distance(&points[b]))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

fn dedup(points: &[Point3<f64>]) -> Vec<Point3<f64>> {
    let mut seen = HashSet::with_capacity(points.len());
    points
        .iter()
        .filter(|p| p.iter().all(|c| c.is_finite()))
        .filter(|p| seen.insert([p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]))
        .copied()
        .collect()
}

fn initial_simplex(points: &[Point3<f64>], eps: f64) -> Result<(Vec<HullFace>, Point3<f64>)> {
    let mut extremes = [0usize; 6];
    for (i, p) in points.iter().enumerate() {
        for axis in 0..3 {
            if p[axis] < points[extremes[axis * 2]][axis] {
                extremes[axis * 2] = i;
            }
            if p[axis] > points[extremes[axis * 2 + 1]][axis] {
                extremes[axis * 2 + 1] = i;
            }
        }
    }

    let mut best = (extremes[0], extremes[1], 0.0);
    for (i, &a) in extremes.iter().enumerate() {
        for &b in &extremes[i + 1..] {
            let d = (points[a] - points[b]).norm_squared();
            if d > best.2 {
                best = (a, b, d);
            }
        }
    }
    let (p0, p1, _) = best;

    let dir = (points[p1] - points[p0]).normalize();
    let p2 = farthest_by(points, &[p0, p1], |p| {
        let v = p - points[p0];
        (v - dir * v.dot(&dir)).norm()
    })
    .filter(|&(_, d)| d > eps)
    .map(|(i, _)| i)
    .ok_or_else(|| MeshError::degenerate("all points are collinear"))?;

    let normal = (points[p1] - points[p0])
        .cross(&(points[p2] - points[p0]))
        .normalize();
    let p3 = farthest_by(points, &[p0, p1, p2], |p| normal.dot(&(p - points[p0])).abs())
        .filter(|&(_, d)| d > eps)
        .map(|(i, _)| i)
        .ok_or_else(|| MeshError::degenerate("all points are coplanar"))?;

    let interior = Point3::from(
        (points[p0].coords + points[p1].coords + points[p2].coords + points[p3].coords) / 4.0,
    );
    let mut faces = vec![
        HullFace::facing_away(p0, p1, p2, &interior, points),
        HullFace::facing_away(p0, p2, p3, &interior, points),
        HullFace::facing_away(p0, p3, p1, &interior, points),
        HullFace::facing_away(p1, p3, p2, &interior, points),
    ];

    let seeds = [p0, p1, p2, p3];
    let rest: Vec<usize> = (0..points.len()).filter(|i| !seeds.contains(i)).collect();
    assign(&mut faces, &rest, points, eps);
    Ok((faces, interior))
}

fn farthest_by(
    points: &[Point3<f64>],
    skip: &[usize],
    metric: impl Fn(&Point3<f64>) -> f64,
) -> Option<(usize, f64)> {
    points
        .iter()
        .enumerate()
        .filter(|(i, _)| !skip.contains(i))
        .map(|(i, p)| (i, metric(p)))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}

fn assign(faces: &mut [HullFace], candidates: &[usize], points: &[Point3<f64>], eps: f64) {
    for &idx in candidates {
        if let Some(face) = faces.iter_mut().find(|f| f.distance(&points[idx]) > eps) {
            face.outside.push(idx);
        }
    }
}

/// `interior` is the seed tetrahedron's centroid, which stays strictly
/// inside the hull as it grows.
fn expand(
    faces: &mut Vec<HullFace>,
    interior: &Point3<f64>,
    points: &[Point3<f64>],
    eps: f64,
) -> Result<()> {
    // Each pass turns one outside point into a hull vertex.
    let max_passes = points.len() + 1;

    for _ in 0..max_passes {
        let Some(apex) = faces
            .iter()
            .find(|f| !f.outside.is_empty())
            .and_then(|f| f.farthest_outside(points))
        else {
            return Ok(());
        };
        let eye = points[apex];

        let (visible, kept): (Vec<HullFace>, Vec<HullFace>) = std::mem::take(faces)
            .into_iter()
            .partition(|f| f.distance(&eye) > eps);

        let horizon = horizon_edges(&visible);
        if horizon.is_empty() {
            return Err(MeshError::degenerate("hull update produced an empty horizon"));
        }

        let orphans: Vec<usize> = visible
            .iter()
            .flat_map(|f| f.outside.iter().copied())
            .filter(|&i| i != apex)
            .collect();

        *faces = kept;
        let first_new = faces.len();
        for (a, b) in horizon {
            faces.push(HullFace::facing_away(a, b, apex, interior, points));
        }
        assign(&mut faces[first_new..], &orphans, points, eps);
    }

    Err(MeshError::degenerate("convex hull did not converge"))
}

/// Edges that belong to exactly one visible face, in that face's winding.
fn horizon_edges(visible: &[HullFace]) -> Vec<(usize, usize)> {
    let mut count: HashMap<(usize, usize), usize> = HashMap::new();
    let edges = |f: &HullFace| {
        let [a, b, c] = f.vertices;
        [(a, b), (b, c), (c, a)]
    };
    for f in visible {
        for (a, b) in edges(f) {
            *count.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    visible
        .iter()
        .flat_map(edges)
        .filter(|&(a, b)| count[&(a.min(b), a.max(b))] == 1)
        .collect()
}

fn to_mesh(faces: &[HullFace], points: &[Point3<f64>]) -> Mesh {
    let mut remap: BTreeMap<usize, u32> = faces
        .iter()
        .flat_map(|f| f.vertices)
        .map(|v| (v, 0))
        .collect();
    let mut mesh = Mesh::with_capacity(remap.len(), faces.len());
    for (src, dst) in remap.iter_mut() {
        *dst = mesh.add_vertex(points[*src]);
    }
    for f in faces {
        let [a, b, c] = f.vertices;
        mesh.add_face(remap[&a], remap[&b], remap[&c]);
    }
    mesh
}
