use crate::keywords::{Shape, ShapeDescriptor};
use nalgebra::Vector3;
use proto3d_core::csg;
use proto3d_core::error::Result;
use proto3d_core::primitives::{
    annulus, cone, cube, cuboid, cylinder, icosphere, torus, DEFAULT_SECTIONS, ICOSPHERE_SUBDIVISIONS,
};
use proto3d_core::Mesh;

/// Unit-size dimensions of one part; multiplied by the descriptor size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartKind {
    Box { x: f64, y: f64, z: f64 },
    Cylinder { radius: f64, height: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    pub kind: PartKind,
    pub offset: [f64; 3],
}

const fn block(x: f64, y: f64, z: f64, offset: [f64; 3]) -> Part {
    Part {
        kind: PartKind::Box { x, y, z },
        offset,
    }
}

const fn rod(radius: f64, height: f64, offset: [f64; 3]) -> Part {
    Part {
        kind: PartKind::Cylinder { radius, height },
        offset,
    }
}

pub static CAR: [Part; 6] = [
    block(1.0, 0.4, 0.3, [0.0, 0.0, 0.0]),
    block(0.6, 0.3, 0.2, [0.0, 0.0, 0.25]),
    rod(0.1, 0.05, [0.25, 0.25, -0.15]),
    rod(0.1, 0.05, [-0.25, 0.25, -0.15]),
    rod(0.1, 0.05, [0.25, -0.25, -0.15]),
    rod(0.1, 0.05, [-0.25, -0.25, -0.15]),
];

pub static CHAIR: [Part; 6] = [
    block(0.6, 0.6, 0.1, [0.0, 0.0, 0.4]),
    block(0.6, 0.1, 0.6, [0.0, -0.25, 0.7]),
    rod(0.05, 0.4, [0.25, 0.25, 0.2]),
    rod(0.05, 0.4, [-0.25, 0.25, 0.2]),
    rod(0.05, 0.4, [0.25, -0.25, 0.2]),
    rod(0.05, 0.4, [-0.25, -0.25, 0.2]),
];

pub static TABLE: [Part; 5] = [
    block(1.0, 1.0, 0.1, [0.0, 0.0, 0.5]),
    rod(0.05, 0.5, [0.4, 0.4, 0.25]),
    rod(0.05, 0.5, [-0.4, 0.4, 0.25]),
    rod(0.05, 0.5, [0.4, -0.4, 0.25]),
    rod(0.05, 0.5, [-0.4, -0.4, 0.25]),
];

pub static BOTTLE: [Part; 3] = [
    rod(0.2, 0.6, [0.0, 0.0, 0.0]),
    rod(0.1, 0.2, [0.0, 0.0, 0.4]),
    rod(0.12, 0.05, [0.0, 0.0, 0.525]),
];

impl Part {
    pub fn build(&self, scale: f64) -> Mesh {
        let mesh = match self.kind {
            PartKind::Box { x, y, z } => cuboid(x * scale, y * scale, z * scale),
            PartKind::Cylinder { radius, height } => cylinder(radius * scale, height * scale, DEFAULT_SECTIONS),
        };
        mesh.translated(Vector3::from(self.offset) * scale)
    }
}

/// Concatenates the parts. Overlapping parts are left intersecting.
pub fn assemble(parts: &[Part], scale: f64) -> Mesh {
    let meshes: Vec<Mesh> = parts.iter().map(|p| p.build(scale)).collect();
    Mesh::concatenate(&meshes)
}

pub fn build_shape(desc: &ShapeDescriptor) -> Result<Mesh> {
    let s = desc.size;
    let mesh = match desc.shape {
        Shape::Sphere => icosphere(0.5 * s, ICOSPHERE_SUBDIVISIONS),
        Shape::Cube => cube(s),
        Shape::Cylinder => cylinder(0.3 * s, s, DEFAULT_SECTIONS),
        Shape::Cone => cone(0.5 * s, s, DEFAULT_SECTIONS),
        Shape::Torus => torus(0.5 * s, 0.2 * s, 48, 24),
        Shape::Car => assemble(&CAR, s),
        Shape::Chair => assemble(&CHAIR, s),
        Shape::Table => assemble(&TABLE, s),
        Shape::Mug => mug(s)?,
        Shape::Bottle => assemble(&BOTTLE, s),
    };
    tracing::debug!(
        shape = %desc.shape,
        size = s,
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "built shape"
    );
    Ok(mesh)
}

/// Hollow cylinder with a closed floor and a side handle.
fn mug(s: f64) -> Result<Mesh> {
    let body = cylinder(0.3 * s, 0.5 * s, DEFAULT_SECTIONS);
    let inner =
        cylinder(0.25 * s, 0.45 * s, DEFAULT_SECTIONS).translated(Vector3::new(0.0, 0.0, 0.025 * s));
    let shell = csg::difference(&body, &inner)?;

    let (r_min, r_max) = (0.05 * s, 0.0);
    tracing::warn!(r_min, r_max, "mug handle annulus has no outer wall; emitting it inside-out");
    let handle = annulus(r_min, r_max, 0.2 * s, DEFAULT_SECTIONS).translated(Vector3::new(0.3 * s, 0.0, 0.2 * s));
    Ok(Mesh::concatenate([&shell, &handle]))
}
