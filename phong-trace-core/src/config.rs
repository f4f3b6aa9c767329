//! Compile-time/construction-time constants. The core has no runtime
//! configuration surface: all tunables here are `pub const`.

/// Maximum reflection recursion depth.
pub const MAX_DEPTH: u32 = 5;

/// Initial ray segment length / scene diameter scalar.
pub const RAYLENGTH: f32 = 10.0;

/// Faces per stage-1 leaf AABB during BVH construction.
pub const LEAF_GROUP: usize = 100;

/// Minimum face count for a stage-2 BVH node to stop subdividing.
pub const MIN_LEAF_FACES: usize = LEAF_GROUP;

/// Maximum stage-2 BVH recursion depth.
pub const MAX_BVH_DEPTH: u32 = 5;

/// Denominator/degeneracy tolerance for the ray/triangle intersector.
pub const EPS_INTERSECT: f32 = 1e-6;

/// Surface bias used by shadow/reflection ray spawn points.
pub const EPS_BIAS: f32 = 1e-4;
