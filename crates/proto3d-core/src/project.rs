//! View-independent rendering math shared by the plot window and the PNG
//! snapshot: equal-aspect framing, an orbit camera, back-to-front triangle
//! ordering and a viridis colour ramp.

use crate::geom::BBox3;
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth_deg: -60.0,
            elevation_deg: 30.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn orbit(&mut self, d_azimuth: f64, d_elevation: f64) {
        self.azimuth_deg = (self.azimuth_deg + d_azimuth).rem_euclid(360.0);
        self.elevation_deg = (self.elevation_deg + d_elevation).clamp(-89.0, 89.0);
    }

    /// Unit vector from the scene centre towards the viewer.
    pub fn eye(&self) -> Vector3<f64> {
        let (az, el) = (self.azimuth_deg.to_radians(), self.elevation_deg.to_radians());
        Vector3::new(el.cos() * az.cos(), el.cos() * az.sin(), el.sin())
    }

    fn basis(&self) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        let (az, el) = (self.azimuth_deg.to_radians(), self.elevation_deg.to_radians());
        let right = Vector3::new(-az.sin(), az.cos(), 0.0);
        let up = Vector3::new(-el.sin() * az.cos(), -el.sin() * az.sin(), el.cos());
        (right, up, self.eye())
    }
}

/// Cube centred on the mesh midpoint whose half side is half the largest
/// extent of the mesh, so every axis is drawn at the same scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub center: Point3<f64>,
    pub half_extent: f64,
}

impl Framing {
    pub fn of(mesh: &Mesh) -> Self {
        let bbox = mesh.bbox();
        if bbox.is_empty() {
            return Self {
                center: Point3::origin(),
                half_extent: 1.0,
            };
        }
        let half = bbox.half_max_extent();
        Self {
            center: bbox.center(),
            half_extent: if half > 0.0 { half } else { 1.0 },
        }
    }

    pub fn bounds(&self) -> BBox3 {
        let h = Vector3::repeat(self.half_extent);
        BBox3::new(self.center - h, self.center + h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedTriangle {
    /// Screen-plane coordinates in [-1, 1] at zoom 1.
    pub points: [[f64; 2]; 3],
    /// Larger is closer to the viewer.
    pub depth: f64,
    pub color: [u8; 3],
}

/// Projects every face and returns them sorted back to front.
pub fn project(mesh: &Mesh, camera: &Camera) -> Vec<ProjectedTriangle> {
    let framing = Framing::of(mesh);
    let (right, up, eye) = camera.basis();
    // the framing cube's diagonal spans 2 * sqrt(3)
    let scale = camera.zoom / 3f64.sqrt();

    let bbox = mesh.bbox();
    let z_span = (bbox.max.z - bbox.min.z).max(f64::EPSILON);

    let mut out: Vec<ProjectedTriangle> = mesh
        .faces
        .iter()
        .map(|face| {
            let corners = mesh.face_points(face);
            let rel = corners.map(|p| (p - framing.center) / framing.half_extent);
            let points = rel.map(|q| [q.dot(&right) * scale, q.dot(&up) * scale]);
            let depth = rel.iter().map(|q| q.dot(&eye)).sum::<f64>() / 3.0;

            let mean_z = corners.iter().map(|p| p.z).sum::<f64>() / 3.0;
            let base = viridis((mean_z - bbox.min.z) / z_span);
            let shade = match mesh.face_normal(face).try_normalize(1e-18) {
                Some(n) => 0.35 + 0.65 * n.dot(&eye).abs(),
                None => 0.35,
            };
            ProjectedTriangle {
                points,
                depth,
                color: base.map(|c| (c as f64 * shade).round().clamp(0.0, 255.0) as u8),
            }
        })
        .collect();

    out.sort_by(|a, b| a.depth.partial_cmp(&b.depth).unwrap_or(std::cmp::Ordering::Equal));
    out
}

/// Maps a projected point into a `width` x `height` pixel viewport with +y
/// pointing down.
pub fn to_viewport(p: [f64; 2], width: f64, height: f64) -> [f64; 2] {
    let scale = width.min(height) * 0.5 * 0.95;
    [width * 0.5 + p[0] * scale, height * 0.5 - p[1] * scale]
}

const VIRIDIS: [[f64; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

/// Piecewise-linear viridis; `t` is clamped to [0, 1].
pub fn viridis(t: f64) -> [u8; 3] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let f = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    [0, 1, 2].map(|k| (a[k] + (b[k] - a[k]) * f).round() as u8)
}
