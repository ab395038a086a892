use crate::error::{MeshError, Result};
use crate::geom::BBox3;
use nalgebra::{Point3, Vector3};

/// Indexed triangle mesh.
///
/// Faces are index triples into `vertices`. Every constructor in this crate
/// keeps face indices inside the vertex list; `validate` checks it for meshes
/// that come from outside (e.g. a parsed OBJ file).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn add_vertex(&mut self, p: Point3<f64>) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(p);
        idx
    }

    pub fn add_face(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push([a, b, c]);
    }

    pub fn bbox(&self) -> BBox3 {
        BBox3::from_points(&self.vertices)
    }

    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    pub fn translated(mut self, offset: Vector3<f64>) -> Self {
        self.translate(offset);
        self
    }

    /// Appends `other`, offsetting its face indices. Overlapping geometry is
    /// left as-is.
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }

    pub fn concatenate<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut out = Mesh::default();
        for m in meshes {
            out.append(m);
        }
        out
    }

    pub fn face_points(&self, face: &[u32; 3]) -> [Point3<f64>; 3] {
        [
            self.vertices[face[0] as usize],
            self.vertices[face[1] as usize],
            self.vertices[face[2] as usize],
        ]
    }

    /// Unnormalised face normal (length is twice the triangle area).
    pub fn face_normal(&self, face: &[u32; 3]) -> Vector3<f64> {
        let [a, b, c] = self.face_points(face);
        (b - a).cross(&(c - a))
    }

    /// Signed volume via the divergence theorem. Positive for outward winding.
    pub fn signed_volume(&self) -> f64 {
        self.faces
            .iter()
            .map(|f| {
                let [a, b, c] = self.face_points(f);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        for (fi, face) in self.faces.iter().enumerate() {
            for &idx in face {
                if idx as usize >= n {
                    return Err(MeshError::InvalidIndex {
                        face: fi,
                        index: idx,
                        vertex_count: n,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn append_offsets_indices() {
        let mut a = triangle();
        let b = triangle().translated(Vector3::new(0.0, 0.0, 1.0));
        a.append(&b);
        assert_eq!(6, a.vertex_count());
        assert_eq!(vec![[0, 1, 2], [3, 4, 5]], a.faces);
        assert_eq!(1.0, a.vertices[3].z);
        a.validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut m = triangle();
        m.add_face(0, 1, 3);
        match m.validate() {
            Err(MeshError::InvalidIndex { face, index, .. }) => {
                assert_eq!(1, face);
                assert_eq!(3, index);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
