//! ASCII Wavefront OBJ export and import.
//!
//! Only geometry is handled: `v` and `f` statements. Everything else
//! (normals, texture coordinates, groups, materials) is skipped on read and
//! never written.

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;
use nalgebra::Point3;
use std::fmt::Write as _;
use std::path::Path;

/// File name used for every exported model in an output directory.
pub const MODEL_FILE: &str = "model.obj";

pub fn to_obj_string(mesh: &Mesh) -> String {
    let mut out = String::with_capacity(32 * (mesh.vertex_count() + mesh.face_count()) + 64);
    let _ = writeln!(out, "# proto3d");
    let _ = writeln!(out, "# vertices: {} faces: {}", mesh.vertex_count(), mesh.face_count());
    for v in &mesh.vertices {
        let _ = writeln!(out, "v {:.8} {:.8} {:.8}", v.x, v.y, v.z);
    }
    for f in &mesh.faces {
        let _ = writeln!(out, "f {} {} {}", f[0] + 1, f[1] + 1, f[2] + 1);
    }
    out
}

pub fn write_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    mesh.validate()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| MeshError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, to_obj_string(mesh)).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "wrote obj"
    );
    Ok(())
}

pub fn read_obj(path: &Path) -> Result<Mesh> {
    let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&text)
}

pub fn parse_obj(text: &str) -> Result<Mesh> {
    let mut mesh = Mesh::default();
    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let coords = parts
                    .take(3)
                    .map(|s| {
                        s.parse::<f64>()
                            .map_err(|e| MeshError::parse(line_no, format!("bad coordinate {s:?}: {e}")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let [x, y, z] = coords[..] else {
                    return Err(MeshError::parse(line_no, "vertex needs three coordinates"));
                };
                mesh.add_vertex(Point3::new(x, y, z));
            }
            Some("f") => {
                let ids = parts
                    .map(|s| resolve_index(s, mesh.vertex_count(), line_no))
                    .collect::<Result<Vec<_>>>()?;
                if ids.len() < 3 {
                    return Err(MeshError::parse(line_no, "face needs at least three vertices"));
                }
                for k in 1..ids.len() - 1 {
                    mesh.add_face(ids[0], ids[k], ids[k + 1]);
                }
            }
            _ => {}
        }
    }
    mesh.validate()?;
    Ok(mesh)
}

/// Resolves `7`, `7/1`, `7//2`, `7/1/2` and negative (relative) indices to a
/// zero-based vertex index.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32> {
    let head = token.split('/').next().unwrap_or("");
    let raw: i64 = head
        .parse()
        .map_err(|e| MeshError::parse(line, format!("bad face index {token:?}: {e}")))?;
    let idx = match raw {
        0 => return Err(MeshError::parse(line, "face index 0 is not valid in OBJ")),
        r if r > 0 => r - 1,
        r => vertex_count as i64 + r,
    };
    if idx < 0 || idx as usize >= vertex_count {
        return Err(MeshError::parse(
            line,
            format!("face index {raw} out of range ({vertex_count} vertices defined)"),
        ));
    }
    Ok(idx as u32)
}
