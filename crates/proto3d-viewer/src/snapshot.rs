//! Software rasteriser for the same projection the plot window uses, so a
//! model can be previewed without a display.

use crate::ViewerError;
use image::{Rgb, RgbImage};
use proto3d_core::project::{project, to_viewport, Camera};
use proto3d_core::Mesh;
use std::path::Path;

pub const BACKGROUND: [u8; 3] = [255, 255, 255];

pub fn rasterize(mesh: &Mesh, camera: &Camera, width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb(BACKGROUND));
    let (w, h) = (width as f64, height as f64);

    for tri in project(mesh, camera) {
        let [a, b, c] = tri.points.map(|p| to_viewport(p, w, h));
        let area = edge(a, b, c);
        if area.abs() < 1e-12 {
            continue;
        }

        let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0) as u32;
        let max_x = a[0].max(b[0]).max(c[0]).ceil().min(w - 1.0).max(0.0) as u32;
        let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0) as u32;
        let max_y = a[1].max(b[1]).max(c[1]).ceil().min(h - 1.0).max(0.0) as u32;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = [x as f64 + 0.5, y as f64 + 0.5];
                let w0 = edge(b, c, p) * area.signum();
                let w1 = edge(c, a, p) * area.signum();
                let w2 = edge(a, b, p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    img.put_pixel(x, y, Rgb(tri.color));
                }
            }
        }
    }
    img
}

fn edge(a: [f64; 2], b: [f64; 2], p: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (p[1] - a[1]) - (b[1] - a[1]) * (p[0] - a[0])
}

/// Writes a PNG of `mesh` from the default camera.
pub fn render_snapshot(mesh: &Mesh, width: u32, height: u32, path: &Path) -> Result<(), ViewerError> {
    let img = rasterize(mesh, &Camera::default(), width, height);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ViewerError::Snapshot {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| ViewerError::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), width, height, "wrote snapshot");
    Ok(())
}
