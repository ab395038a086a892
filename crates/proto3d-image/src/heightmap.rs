//! Heightmap mesher: brightness becomes elevation, opaque pixels become
//! points, and the points are wrapped in a convex hull.

use crate::error::Result;
use image::RgbaImage;
use nalgebra::Point3;
use proto3d_core::hull::convex_hull;
use proto3d_core::obj::{write_obj, MODEL_FILE};
use proto3d_core::primitives::cube;
use proto3d_core::Mesh;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HeightmapConfig {
    pub blur_sigma: f32,
    /// Height of a fully white pixel.
    pub z_scale: f64,
    /// Below this many opaque pixels the fallback cube is used.
    pub min_points: usize,
    pub fallback_extent: f64,
}

impl Default for HeightmapConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            z_scale: 0.1,
            min_points: 100,
            fallback_extent: 0.5,
        }
    }
}

/// Row-major intensities in [0, 1], one per source pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl Heightmap {
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[y as usize * self.width as usize + x as usize]
    }
}

pub fn heightmap(image: &RgbaImage, blur_sigma: f32) -> Heightmap {
    let gray = image::DynamicImage::ImageRgba8(image.clone()).to_luma8();
    let smooth = if blur_sigma > 0.0 {
        image::imageops::blur(&gray, blur_sigma)
    } else {
        gray
    };
    Heightmap {
        width: smooth.width(),
        height: smooth.height(),
        values: smooth.pixels().map(|p| p[0] as f32 / 255.0).collect(),
    }
}

/// One point per pixel with nonzero alpha. The image is mapped onto
/// [-0.5, 0.5) in x and (-0.5, 0.5] in y with the top row at +y.
pub fn point_cloud(image: &RgbaImage, heights: &Heightmap, z_scale: f64) -> Vec<Point3<f64>> {
    let (w, h) = image.dimensions();
    let mut points = Vec::new();
    for (col, row, px) in image.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        points.push(Point3::new(
            col as f64 / w as f64 - 0.5,
            (h - row) as f64 / h as f64 - 0.5,
            heights.get(col, row) as f64 * z_scale,
        ));
    }
    points
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    TooFewPoints { found: usize, required: usize },
    HullFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::TooFewPoints { found, required } => {
                write!(f, "only {found} foreground points (need {required})")
            }
            FallbackReason::HullFailed(msg) => write!(f, "convex hull failed: {msg}"),
        }
    }
}

/// A mesh plus the reason the fallback cube was substituted, if it was.
#[derive(Debug, Clone)]
pub struct MeshOutcome {
    pub mesh: Mesh,
    pub fallback: Option<FallbackReason>,
}

pub fn mesh_from_points(points: &[Point3<f64>], cfg: &HeightmapConfig) -> MeshOutcome {
    if points.len() < cfg.min_points {
        return MeshOutcome {
            mesh: cube(cfg.fallback_extent),
            fallback: Some(FallbackReason::TooFewPoints {
                found: points.len(),
                required: cfg.min_points,
            }),
        };
    }
    match convex_hull(points) {
        Ok(mesh) => MeshOutcome {
            mesh,
            fallback: None,
        },
        Err(e) => MeshOutcome {
            mesh: cube(cfg.fallback_extent),
            fallback: Some(FallbackReason::HullFailed(e.to_string())),
        },
    }
}

#[derive(Debug, Clone)]
pub struct ImageModel {
    pub model_path: PathBuf,
    pub mesh: Mesh,
    pub point_count: usize,
    pub fallback: Option<FallbackReason>,
}

/// Builds `model.obj` in `output_dir` from a (usually background-removed)
/// image.
pub fn generate_from_image(path: &Path, output_dir: &Path, cfg: &HeightmapConfig) -> Result<ImageModel> {
    let rgba = crate::load_rgba(path)?;
    let heights = heightmap(&rgba, cfg.blur_sigma);
    let points = point_cloud(&rgba, &heights, cfg.z_scale);
    tracing::debug!(
        width = rgba.width(),
        height = rgba.height(),
        points = points.len(),
        "built point cloud"
    );

    let MeshOutcome { mesh, fallback } = mesh_from_points(&points, cfg);
    match &fallback {
        Some(reason) => tracing::warn!(%reason, "using fallback cube"),
        None => tracing::info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "built convex hull"
        ),
    }

    let model_path = output_dir.join(MODEL_FILE);
    write_obj(&mesh, &model_path)?;
    Ok(ImageModel {
        model_path,
        mesh,
        point_count: points.len(),
        fallback,
    })
}
