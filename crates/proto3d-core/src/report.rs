use crate::geom::BBox3;
use crate::mesh::Mesh;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warning {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub bbox: Option<BBox3>,
}

impl MeshStats {
    pub fn of(mesh: &Mesh) -> Self {
        let bbox = mesh.bbox();
        Self {
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            bbox: (!bbox.is_empty()).then_some(bbox),
        }
    }
}

/// Summary of one conversion run, written with `--report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReport {
    /// "image" or "text"
    pub input_type: String,
    pub input: String,
    /// How the mesh was produced, e.g. "convex_hull", "fallback_cube", "mug".
    pub method: String,
    pub size: Option<f64>,
    pub model_path: PathBuf,
    pub removed_background_path: Option<PathBuf>,
    pub mesh: MeshStats,
    pub warnings: Vec<Warning>,
    pub generated_at: DateTime<Utc>,
}

impl ModelReport {
    pub fn new(input_type: &str, input: &str, method: &str, model_path: PathBuf, mesh: &Mesh) -> Self {
        Self {
            input_type: input_type.to_string(),
            input: input.to_string(),
            method: method.to_string(),
            size: None,
            model_path,
            removed_background_path: None,
            mesh: MeshStats::of(mesh),
            warnings: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn warn(&mut self, code: &str, message: impl Into<String>) {
        self.warnings.push(Warning {
            code: code.to_string(),
            message: message.into(),
        });
    }
}
