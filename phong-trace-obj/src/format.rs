use std::io::{BufRead, BufReader, Read};

use phong_trace_core::V3;

use crate::ObjError;

// Wavefront OBJ/MTL line parser.
//
// Supports v, f, g, mtllib & usemtl directives from OBJ, and newmtl, Ka,
// Kd, Ks & Ns from MTL. Faces are assumed triangulated (`f a b c`); vertex
// normals and texture coordinates, if present in a face's `a/b/c` slash
// form, are parsed but discarded — material and lighting are this format's
// only concern (spec's Non-goals exclude texture mapping).

/// A single `v/vt/vn` style face-vertex reference; only the vertex index
/// is ever consulted by the builder.
#[derive(Copy, Clone)]
pub struct ObjVertexRef {
    pub vertex_index: usize,
}

impl std::str::FromStr for ObjVertexRef {
    type Err = ObjError;

    fn from_str(s: &str) -> Result<Self, ObjError> {
        let mut parts = s.split('/');
        let vertex_index = match parts.next() {
            None | Some("") => return Err(ObjError::General(format!("empty face vertex reference: {s}"))),
            Some(v) => v.parse()?,
        };
        Ok(ObjVertexRef { vertex_index })
    }
}

pub struct ObjFace {
    pub a: ObjVertexRef,
    pub b: ObjVertexRef,
    pub c: ObjVertexRef,
    pub mtl: Option<String>,
}

fn try_parse_elements<T, const N: usize>(line: &str) -> Option<[T; N]>
where
    T: std::str::FromStr,
    T: Default,
    T: Copy,
{
    let mut values = [Default::default(); N];
    let mut parts = line.split_whitespace();
    for value in values.iter_mut() {
        *value = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(values)
}

pub struct ObjFile {
    pub mtllib: Option<String>,
    pub vertices: Vec<V3>,
    pub faces: Vec<ObjFace>,
}

#[derive(Default)]
struct ObjFileParseState {
    mtllib: Option<String>,
    vertices: Vec<V3>,
    faces: Vec<ObjFace>,
    mtl: Option<String>,
}

/// Parses an OBJ document from `source` into flat vertex/face lists.
pub fn parse_obj_file(source: &mut dyn Read) -> Result<ObjFile, ObjError> {
    let mut state = ObjFileParseState::default();

    for (line_no, line) in BufReader::new(source).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let directive = line.split_once(' ');
        match directive {
            Some(("mtllib", path)) => {
                state.mtllib = Some(path.trim().to_string());
            }
            Some(("usemtl", name)) => {
                state.mtl = Some(name.trim().to_string());
            }
            Some(("v", data)) => {
                let [x, y, z]: [f32; 3] = try_parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("bad vertex on line {line_no}: {data}")))?;
                state.vertices.push(V3(x, y, z));
            }
            Some(("f", data)) => {
                let parts: Vec<&str> = data.split_whitespace().collect();
                if parts.len() != 3 {
                    return Err(ObjError::General(format!("only triangulated faces are supported, line {line_no}")));
                }
                let a: ObjVertexRef = parts[0].parse()?;
                let b: ObjVertexRef = parts[1].parse()?;
                let c: ObjVertexRef = parts[2].parse()?;
                state.faces.push(ObjFace { a, b, c, mtl: state.mtl.clone() });
            }
            // vt/vn/g/o/s are accepted but not meaningful to this format.
            _ => {}
        }
    }

    Ok(ObjFile { mtllib: state.mtllib, vertices: state.vertices, faces: state.faces })
}

pub struct ObjMaterial {
    pub name: String,
    pub ambient: V3,
    pub diffuse: V3,
    pub specular: V3,
    pub shininess: f32,
}

pub struct MtlFile {
    pub materials: Vec<ObjMaterial>,
}

#[derive(Default)]
struct MtlFileParseState {
    name: Option<String>,
    ambient: V3,
    diffuse: V3,
    specular: V3,
    shininess: f32,
    materials: Vec<ObjMaterial>,
}

impl MtlFileParseState {
    fn try_push_material(&mut self) {
        if let Some(name) = self.name.take() {
            self.materials.push(ObjMaterial {
                name,
                ambient: std::mem::replace(&mut self.ambient, V3::ZERO),
                diffuse: std::mem::replace(&mut self.diffuse, V3::ZERO),
                specular: std::mem::replace(&mut self.specular, V3::ZERO),
                shininess: std::mem::replace(&mut self.shininess, 0.0),
            });
        }
    }
}

/// Parses an MTL document, collecting `Ka`/`Kd`/`Ks`/`Ns` per `newmtl` block.
pub fn parse_mtl_file(source: &mut dyn Read) -> Result<MtlFile, ObjError> {
    let mut state = MtlFileParseState::default();

    for (line_no, line) in BufReader::new(source).lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let directive = line.split_once(' ');
        match directive {
            Some(("newmtl", name)) => {
                state.try_push_material();
                state.name = Some(name.trim().to_string());
            }
            Some(("Ka", data)) => {
                let [r, g, b]: [f32; 3] = try_parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("bad Ka on line {line_no}: {data}")))?;
                state.ambient = V3(r, g, b);
            }
            Some(("Kd", data)) => {
                let [r, g, b]: [f32; 3] = try_parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("bad Kd on line {line_no}: {data}")))?;
                state.diffuse = V3(r, g, b);
            }
            Some(("Ks", data)) => {
                let [r, g, b]: [f32; 3] = try_parse_elements(data)
                    .ok_or_else(|| ObjError::General(format!("bad Ks on line {line_no}: {data}")))?;
                state.specular = V3(r, g, b);
            }
            Some(("Ns", data)) => {
                let shininess: f32 = data
                    .trim()
                    .parse()
                    .map_err(|_| ObjError::General(format!("bad Ns on line {line_no}: {data}")))?;
                state.shininess = shininess;
            }
            _ => {}
        }
    }

    state.try_push_material();
    Ok(MtlFile { materials: state.materials })
}
