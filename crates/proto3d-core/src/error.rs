use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("boolean operation failed: {0}")]
    Boolean(String),

    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidIndex {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl MeshError {
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::Degenerate(message.into())
    }

    pub fn boolean(message: impl Into<String>) -> Self {
        Self::Boolean(message.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T, E = MeshError> = std::result::Result<T, E>;
