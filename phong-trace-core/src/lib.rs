//! Core raytracing kernels: BVH construction and traversal, ray/AABB and
//! ray/triangle intersection, Phong shading with hard shadows, and the
//! recursive mirror-reflection trace driver. No I/O, no mesh loading, no
//! concurrency: those live in the `phong-trace-obj` and `phong-trace-cli`
//! crates built on top of this one.

pub mod aabb;
pub mod bvh;
pub mod camera;
pub mod config;
pub mod error;
pub mod hit;
pub mod image;
pub mod light;
pub mod material;
pub mod orchestrator;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod trace;
pub mod triangle;
pub mod vec;

pub use aabb::Aabb;
pub use bvh::Bvh;
pub use camera::Camera;
pub use error::RaytraceError;
pub use hit::{find_nearest_hit, Hit};
pub use image::Image;
pub use light::PointLight;
pub use material::{resolve_material, Material, DEFAULT_MATERIAL};
pub use orchestrator::{render, render_row, trace_debug_ray, DebugRayProbe};
pub use ray::Ray;
pub use scene::Scene;
pub use shading::{is_occluded, phong_shade};
pub use trace::{trace_ray, trace_ray_with_probe};
pub use triangle::{intersect_triangle, Face, TriangleHit};
pub use vec::{V2, V3};
