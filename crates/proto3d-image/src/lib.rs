//! Image side of the converter: background removal followed by a
//! heightmap-derived mesh.

pub mod background;
pub mod error;
pub mod heightmap;

pub use background::{remove_background, BackgroundConfig, BorderKeySegmenter, Segmenter};
pub use error::ImageError;
pub use heightmap::{generate_from_image, FallbackReason, HeightmapConfig, ImageModel, MeshOutcome};

#[cfg(feature = "onnx")]
pub use background::OnnxSegmenter;

use error::Result;
use image::RgbaImage;
use std::path::Path;

/// Decodes any supported image into RGBA8. Images without an alpha channel
/// come back fully opaque.
pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        return Err(ImageError::FileNotFound(path.to_path_buf()));
    }
    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let decoded = reader.decode().map_err(|source| ImageError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.to_rgba8())
}
