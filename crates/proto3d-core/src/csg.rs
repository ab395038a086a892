//! Solid boolean difference on closed triangle meshes, using a BSP tree in
//! the style of csg.js.

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

const PLANE_EPSILON: f64 = 1e-7;

/// `a - b`. Both inputs must be closed and outward-wound.
///
/// The volume is exact, but faces split by the other operand's planes leave
/// T-junctions, so the result is not edge-manifold wherever a split happened.
pub fn difference(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    let a_polys = polygons_of(a)?;
    let b_polys = polygons_of(b)?;

    let mut a = BspNode::new(a_polys);
    let mut b = BspNode::new(b_polys);
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();

    let mesh = mesh_of(&a.all_polygons());
    if mesh.is_empty() {
        return Err(MeshError::boolean("difference produced an empty solid"));
    }
    Ok(mesh)
}

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    fn through(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(1e-15)?;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn side(&self, p: &Point3<f64>) -> Side {
        let t = self.normal.dot(&p.coords) - self.w;
        if t < -PLANE_EPSILON {
            Side::Back
        } else if t > PLANE_EPSILON {
            Side::Front
        } else {
            Side::Coplanar
        }
    }

    /// Sorts `poly` into the four buckets, splitting it when it spans the
    /// plane.
    fn split(
        &self,
        poly: Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let sides: Vec<Side> = poly.vertices.iter().map(|v| self.side(v)).collect();
        let kind = sides.iter().fold(Side::Coplanar, |acc, s| acc.merge(*s));

        match kind {
            Side::Coplanar => {
                if self.normal.dot(&poly.plane.normal) > 0.0 {
                    coplanar_front.push(poly);
                } else {
                    coplanar_back.push(poly);
                }
            }
            Side::Front => front.push(poly),
            Side::Back => back.push(poly),
            Side::Spanning => {
                let n = poly.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (poly.vertices[i], poly.vertices[j]);
                    if si != Side::Back {
                        f.push(vi);
                    }
                    if si != Side::Front {
                        b.push(vi);
                    }
                    if si.merge(sj) == Side::Spanning {
                        let t = (self.w - self.normal.dot(&vi.coords))
                            / self.normal.dot(&(vj - vi));
                        let v = vi + (vj - vi) * t;
                        f.push(v);
                        b.push(v);
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon {
                        vertices: f,
                        plane: poly.plane,
                    });
                }
                if b.len() >= 3 {
                    back.push(Polygon {
                        vertices: b,
                        plane: poly.plane,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Coplanar,
    Front,
    Back,
    Spanning,
}

impl Side {
    fn merge(self, other: Side) -> Side {
        match (self, other) {
            (Side::Coplanar, s) | (s, Side::Coplanar) => s,
            (a, b) if a == b => a,
            _ => Side::Spanning,
        }
    }
}

#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Point3<f64>>,
    plane: Plane,
}

impl Polygon {
    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}

#[derive(Debug, Default)]
struct BspNode {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    fn invert(&mut self) {
        for p in &mut self.polygons {
            p.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes the parts of `polygons` that lie inside this tree's solid.
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };
        let mut front = Vec::new();
        let mut back = Vec::new();
        for p in polygons {
            // coplanar pieces follow their facing direction
            let (mut cf, mut cb) = (Vec::new(), Vec::new());
            plane.split(p, &mut cf, &mut cb, &mut front, &mut back);
            front.append(&mut cf);
            back.append(&mut cb);
        }
        let mut front = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        let back = match &self.back {
            Some(node) => node.clip_polygons(back),
            None => Vec::new(),
        };
        front.extend(back);
        front
    }

    fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        let mut out = self.polygons.clone();
        if let Some(front) = &self.front {
            out.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            out.extend(back.all_polygons());
        }
        out
    }

    fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        let plane = *self.plane.get_or_insert(polygons[0].plane);
        let mut front = Vec::new();
        let mut back = Vec::new();
        let mut coplanar = Vec::new();
        for p in polygons {
            let (mut cf, mut cb) = (Vec::new(), Vec::new());
            plane.split(p, &mut cf, &mut cb, &mut front, &mut back);
            coplanar.append(&mut cf);
            coplanar.append(&mut cb);
        }
        self.polygons.extend(coplanar);
        if !front.is_empty() {
            self.front.get_or_insert_with(Default::default).build(front);
        }
        if !back.is_empty() {
            self.back.get_or_insert_with(Default::default).build(back);
        }
    }
}

fn polygons_of(mesh: &Mesh) -> Result<Vec<Polygon>> {
    mesh.validate()?;
    let polys: Vec<Polygon> = mesh
        .faces
        .iter()
        .filter_map(|f| {
            let [a, b, c] = mesh.face_points(f);
            Plane::through(&a, &b, &c).map(|plane| Polygon {
                vertices: vec![a, b, c],
                plane,
            })
        })
        .collect();
    if polys.is_empty() {
        return Err(MeshError::boolean("operand has no non-degenerate faces"));
    }
    Ok(polys)
}

/// Fan-triangulates the polygons, welding bit-identical vertices.
fn mesh_of(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::default();
    let mut index: HashMap<[u64; 3], u32> = HashMap::new();
    let mut vertex = |mesh: &mut Mesh, p: &Point3<f64>| -> u32 {
        *index
            .entry([p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
            .or_insert_with(|| mesh.add_vertex(*p))
    };
    for poly in polygons {
        let ids: Vec<u32> = poly.vertices.iter().map(|p| vertex(&mut mesh, p)).collect();
        for i in 1..ids.len() - 1 {
            if ids[0] != ids[i] && ids[i] != ids[i + 1] && ids[0] != ids[i + 1] {
                mesh.add_face(ids[0], ids[i], ids[i + 1]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_merge_is_spanning_only_for_front_and_back() {
        assert_eq!(Side::Front, Side::Coplanar.merge(Side::Front));
        assert_eq!(Side::Back, Side::Back.merge(Side::Back));
        assert_eq!(Side::Spanning, Side::Front.merge(Side::Back));
    }
}
