/// Fatal conditions the core surfaces to its caller (spec §7). Routine
/// conditions — ray miss, degenerate triangle, empty light set — never
/// produce one of these; they fall out of `Option`/default shading
/// instead.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaytraceError {
    #[error("mesh has no faces; cannot build a bounding volume hierarchy")]
    EmptyMesh,
    #[error("image dimensions must be positive, got {width}x{height}")]
    InvalidImageDimensions { width: i64, height: i64 },
}
