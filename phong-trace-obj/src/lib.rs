mod builder;
mod format;

pub use builder::{load_scene_mesh, MeshData};
pub use format::{parse_mtl_file, parse_obj_file, MtlFile, ObjFace, ObjFile, ObjMaterial};

/// Errors raised while reading an OBJ/MTL mesh description. Distinct from
/// [`phong_trace_core::RaytraceError`]: these are input-format failures,
/// not raytrace-engine failures, and never reach the core.
#[derive(thiserror::Error, Debug)]
pub enum ObjError {
    #[error("error parsing mesh file: {0}")]
    General(String),
    #[error("io error reading mesh file")]
    IoError(#[from] std::io::Error),
    #[error("integer parse error in mesh file")]
    IntParseError(#[from] std::num::ParseIntError),
    #[error("float parse error in mesh file")]
    FloatParseError(#[from] std::num::ParseFloatError),
}
