//! Background removal.
//!
//! A [`Segmenter`] clears the alpha of every background pixel in place.
//! [`BorderKeySegmenter`] is always available and works on images shot
//! against a roughly uniform backdrop. With the `onnx` feature a salient
//! object model can be used instead.

use crate::error::{ImageError, Result};
use image::RgbaImage;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub const REMOVED_BG_FILE: &str = "removed_bg.png";

pub trait Segmenter {
    fn name(&self) -> &'static str;

    /// Sets alpha to 0 on background pixels. Foreground pixels keep their
    /// colour; alpha may be lowered but is never raised.
    fn segment(&self, image: &mut RgbaImage) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct BackgroundConfig {
    /// Euclidean RGB distance under which a pixel counts as background.
    pub tolerance: f32,
    /// Salient-object ONNX model; ignored unless built with `onnx`.
    pub model: Option<PathBuf>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            tolerance: 32.0,
            model: None,
        }
    }
}

impl BackgroundConfig {
    pub fn segmenter(&self) -> Box<dyn Segmenter> {
        let border = BorderKeySegmenter::new(self.tolerance);
        match &self.model {
            #[cfg(feature = "onnx")]
            Some(model) => Box::new(OnnxSegmenter::new(model.clone(), border)),
            #[cfg(not(feature = "onnx"))]
            Some(model) => {
                tracing::warn!(
                    model = %model.display(),
                    "built without the onnx feature; using border key segmentation"
                );
                Box::new(border)
            }
            None => Box::new(border),
        }
    }
}

/// Loads `input`, removes its background and writes `removed_bg.png` into
/// `output_dir`, replacing any previous file.
pub fn remove_background(input: &Path, output_dir: &Path, cfg: &BackgroundConfig) -> Result<PathBuf> {
    let mut rgba = crate::load_rgba(input)?;

    std::fs::create_dir_all(output_dir).map_err(|source| ImageError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let segmenter = cfg.segmenter();
    segmenter.segment(&mut rgba)?;

    let out = output_dir.join(REMOVED_BG_FILE);
    rgba.save_with_format(&out, image::ImageFormat::Png)
        .map_err(|source| ImageError::Save {
            path: out.clone(),
            source,
        })?;

    let kept = rgba.pixels().filter(|p| p[3] > 0).count();
    tracing::info!(
        segmenter = segmenter.name(),
        path = %out.display(),
        foreground_pixels = kept,
        "removed background"
    );
    Ok(out)
}

/// Keys out the colour found along the image border.
///
/// The key is the per-channel median of the border pixels. Background is
/// everything 4-connected to the border whose colour lies within
/// `tolerance` of the key; enclosed regions of the same colour are kept.
#[derive(Debug, Clone, Copy)]
pub struct BorderKeySegmenter {
    pub tolerance: f32,
}

impl BorderKeySegmenter {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    pub fn key_color(image: &RgbaImage) -> Option<[u8; 3]> {
        let (w, h) = image.dimensions();
        let mut channels: [Vec<u8>; 3] = Default::default();
        for (x, y) in border_coords(w, h) {
            let p = image.get_pixel(x, y);
            if p[3] == 0 {
                continue;
            }
            for c in 0..3 {
                channels[c].push(p[c]);
            }
        }
        if channels[0].is_empty() {
            return None;
        }
        Some(channels.map(|mut values| {
            values.sort_unstable();
            values[values.len() / 2]
        }))
    }
}

impl Segmenter for BorderKeySegmenter {
    fn name(&self) -> &'static str {
        "border-key"
    }

    fn segment(&self, image: &mut RgbaImage) -> Result<()> {
        let Some(key) = Self::key_color(image) else {
            return Ok(());
        };
        let (w, h) = image.dimensions();
        let tol2 = self.tolerance * self.tolerance;
        let is_background = |p: &image::Rgba<u8>| {
            if p[3] == 0 {
                return true;
            }
            let d2: f32 = (0..3)
                .map(|c| {
                    let d = p[c] as f32 - key[c] as f32;
                    d * d
                })
                .sum();
            d2 <= tol2
        };

        let idx = |x: u32, y: u32| y as usize * w as usize + x as usize;
        let mut visited = vec![false; w as usize * h as usize];
        let mut queue = VecDeque::new();
        for (x, y) in border_coords(w, h) {
            if !visited[idx(x, y)] && is_background(image.get_pixel(x, y)) {
                visited[idx(x, y)] = true;
                queue.push_back((x, y));
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            image.get_pixel_mut(x, y)[3] = 0;
            let neighbours = [
                (x.wrapping_sub(1), y),
                (x + 1, y),
                (x, y.wrapping_sub(1)),
                (x, y + 1),
            ];
            for (nx, ny) in neighbours {
                if nx >= w || ny >= h || visited[idx(nx, ny)] {
                    continue;
                }
                if is_background(image.get_pixel(nx, ny)) {
                    visited[idx(nx, ny)] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
        Ok(())
    }
}

fn border_coords(w: u32, h: u32) -> impl Iterator<Item = (u32, u32)> {
    let rows = (0..w).flat_map(move |x| {
        let bottom = (h > 1).then(|| (x, h - 1));
        std::iter::once((x, 0)).chain(bottom)
    });
    let cols = (1..h.saturating_sub(1)).flat_map(move |y| {
        let right = (w > 1).then(|| (w - 1, y));
        std::iter::once((0, y)).chain(right)
    });
    rows.chain(cols).filter(move |_| w > 0 && h > 0)
}

#[cfg(feature = "onnx")]
pub use onnx::OnnxSegmenter;

#[cfg(feature = "onnx")]
mod onnx {
    use super::{BorderKeySegmenter, Segmenter};
    use crate::error::Result;
    use image::imageops::FilterType;
    use image::{GrayImage, Luma, RgbaImage};
    use ndarray::Array4;
    use ort::session::Session;
    use ort::value::Value;
    use std::path::PathBuf;

    const INPUT_SIZE: u32 = 320;
    // ImageNet normalization constants
    const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    const STD: [f32; 3] = [0.229, 0.224, 0.225];

    /// U²-Net style salient object segmentation. Falls back to the border
    /// key when the model cannot be loaded or run.
    pub struct OnnxSegmenter {
        model_path: PathBuf,
        fallback: BorderKeySegmenter,
    }

    impl OnnxSegmenter {
        pub fn new(model_path: PathBuf, fallback: BorderKeySegmenter) -> Self {
            Self {
                model_path,
                fallback,
            }
        }

        fn mask(&self, image: &RgbaImage) -> Option<GrayImage> {
            if !self.model_path.exists() {
                tracing::warn!(model = %self.model_path.display(), "segmentation model not found");
                return None;
            }
            let mut session = Session::builder()
                .ok()?
                .commit_from_file(&self.model_path)
                .ok()?;

            let resized = image::imageops::resize(image, INPUT_SIZE, INPUT_SIZE, FilterType::Lanczos3);
            let mut input = Array4::<f32>::zeros((1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize));
            for (x, y, p) in resized.enumerate_pixels() {
                for c in 0..3 {
                    input[[0, c, y as usize, x as usize]] = (p[c] as f32 / 255.0 - MEAN[c]) / STD[c];
                }
            }

            let input_val = Value::from_array(input).ok()?;
            let input_name = session
                .inputs
                .first()
                .map(|i| i.name.clone())
                .unwrap_or_else(|| "input.1".into());
            let outputs = session.run(ort::inputs![input_name => input_val]).ok()?;
            let arr = outputs[0].try_extract_array::<f32>().ok()?;

            let shape = arr.shape();
            let (oh, ow) = match shape.len() {
                4 => (shape[2], shape[3]),
                3 => (shape[1], shape[2]),
                2 => (shape[0], shape[1]),
                _ => return None,
            };
            let flat: Vec<f32> = arr.iter().copied().take(oh * ow).collect();
            let (lo, hi) = flat
                .iter()
                .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
            let range = (hi - lo).max(1e-6);

            let small = GrayImage::from_fn(ow as u32, oh as u32, |x, y| {
                let v = flat.get(y as usize * ow + x as usize).copied().unwrap_or(lo);
                Luma([(((v - lo) / range) * 255.0).round() as u8])
            });
            let (w, h) = image.dimensions();
            Some(image::imageops::resize(&small, w, h, FilterType::Triangle))
        }
    }

    impl Segmenter for OnnxSegmenter {
        fn name(&self) -> &'static str {
            "onnx"
        }

        fn segment(&self, image: &mut RgbaImage) -> Result<()> {
            let Some(mask) = self.mask(image) else {
                tracing::warn!("onnx segmentation unavailable, using border key");
                return self.fallback.segment(image);
            };
            for (p, m) in image.pixels_mut().zip(mask.pixels()) {
                p[3] = p[3].min(m[0]);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_coords_visit_each_edge_pixel_once() {
        let mut seen: Vec<_> = border_coords(4, 3).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(10, seen.len());
        assert_eq!(1, border_coords(1, 1).count());
        assert_eq!(0, border_coords(0, 5).count());
    }

    #[test]
    fn key_is_the_border_median() {
        let mut img = RgbaImage::from_pixel(5, 5, image::Rgba([250, 250, 250, 255]));
        img.put_pixel(0, 0, image::Rgba([0, 0, 0, 255]));
        assert_eq!(Some([250, 250, 250]), BorderKeySegmenter::key_color(&img));
    }
}
