use std::path::Path;

use phong_trace_core::{Face, Material, V3};

use crate::format::{parse_mtl_file, parse_obj_file, MtlFile, ObjFace, ObjFile};
use crate::ObjError;

/// A loaded mesh ready to hand to [`phong_trace_core::Scene::build`]:
/// flattened faces with precomputed unit normals, and a material table
/// indexed by each face's `material_id`.
pub struct MeshData {
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
}

fn resolve_vertex(vertices: &[V3], index: usize) -> Result<V3, ObjError> {
    // OBJ vertex references are 1-based.
    vertices
        .get(index.wrapping_sub(1))
        .copied()
        .ok_or_else(|| ObjError::General(format!("face references out-of-range vertex {index}")))
}

fn build_face(vertices: &[V3], obj_face: &ObjFace, material_id: i32) -> Result<Face, ObjError> {
    let a = resolve_vertex(vertices, obj_face.a.vertex_index)?;
    let b = resolve_vertex(vertices, obj_face.b.vertex_index)?;
    let c = resolve_vertex(vertices, obj_face.c.vertex_index)?;
    let normal = V3::cross(b - a, c - a).normalize();
    Ok(Face::new(a, b, c, normal, material_id))
}

/// Converts a parsed OBJ document (and optional MTL document) into the
/// flattened faces/materials the core consumes. The material table's
/// order is the order materials first appear in the MTL file; faces
/// referencing an unknown `usemtl` name fall back to `material_id = -1`
/// (the core's default material), the same as a face with no `usemtl`
/// directive.
pub fn build_mesh(obj: ObjFile, mtl: Option<MtlFile>) -> Result<MeshData, ObjError> {
    let materials: Vec<Material> = mtl
        .as_ref()
        .map(|mtl| {
            mtl.materials
                .iter()
                .map(|m| Material::new(m.ambient, m.diffuse, m.specular, m.shininess))
                .collect()
        })
        .unwrap_or_default();

    let material_index = |name: &Option<String>| -> i32 {
        let Some(mtl) = mtl.as_ref() else { return -1 };
        let Some(name) = name else { return -1 };
        mtl.materials
            .iter()
            .position(|m| &m.name == name)
            .map(|i| i as i32)
            .unwrap_or(-1)
    };

    let mut faces = Vec::with_capacity(obj.faces.len());
    for obj_face in &obj.faces {
        let material_id = material_index(&obj_face.mtl);
        faces.push(build_face(&obj.vertices, obj_face, material_id)?);
    }

    Ok(MeshData { faces, materials })
}

/// Loads an OBJ mesh (and its associated MTL file, if `mtllib` is
/// present) from disk, resolving the MTL path relative to the OBJ's own
/// directory.
pub fn load_scene_mesh(path: impl AsRef<Path>) -> Result<MeshData, ObjError> {
    let obj_path = path.as_ref();
    let mut obj_source = std::fs::File::open(obj_path)?;
    let obj = parse_obj_file(&mut obj_source)?;

    let mtl = match &obj.mtllib {
        None => None,
        Some(mtllib) => {
            let mtl_path = obj_path
                .parent()
                .map(|dir| dir.join(mtllib))
                .unwrap_or_else(|| Path::new(mtllib).to_path_buf());
            let mut mtl_source = std::fs::File::open(&mtl_path)?;
            Some(parse_mtl_file(&mut mtl_source)?)
        }
    };

    log::info!("loaded mesh {} ({} faces)", obj_path.display(), obj.faces.len());
    build_mesh(obj, mtl)
}
