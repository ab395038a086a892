pub mod csg;
pub mod error;
pub mod geom;
pub mod hull;
pub mod mesh;
pub mod obj;
pub mod primitives;
pub mod project;
pub mod report;

pub use error::MeshError;
pub use mesh::Mesh;
