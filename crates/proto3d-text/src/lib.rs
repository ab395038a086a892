//! Text side of the converter: keyword matching followed by primitive
//! assembly.

pub mod assemble;
pub mod keywords;

pub use assemble::build_shape;
pub use keywords::{extract_descriptor, Shape, ShapeDescriptor};

use proto3d_core::error::Result;
use proto3d_core::obj::{write_obj, MODEL_FILE};
use proto3d_core::Mesh;
use rand::Rng;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TextModel {
    pub model_path: PathBuf,
    pub mesh: Mesh,
    pub descriptor: ShapeDescriptor,
}

/// Builds `model.obj` in `output_dir` from a prompt. `rng` is only consulted
/// when no shape keyword matches.
pub fn generate_from_text<R: Rng + ?Sized>(text: &str, output_dir: &Path, rng: &mut R) -> Result<TextModel> {
    let descriptor = extract_descriptor(text, rng);
    let mesh = build_shape(&descriptor)?;
    let model_path = output_dir.join(MODEL_FILE);
    write_obj(&mesh, &model_path)?;
    tracing::info!(
        shape = %descriptor.shape,
        size = descriptor.size,
        path = %model_path.display(),
        "generated model from text"
    );
    Ok(TextModel {
        model_path,
        mesh,
        descriptor,
    })
}
