use crate::ray::Ray;
use crate::scene::Scene;
use crate::triangle::intersect_triangle;
use crate::vec::V3;

/// The result of resolving a ray against the scene: nearest hit within
/// the ray's remaining length budget, per spec §4.5.
#[derive(Debug, Copy, Clone)]
pub struct Hit {
    pub t: f32,
    pub point: V3,
    pub normal: V3,
    pub material_id: i32,
}

/// Collects BVH candidates along `ray` and runs the ray/triangle
/// intersector (§4.4) on each, keeping the candidate with the smallest
/// `t`. Ties (equal `t`) are broken by ascending face index, not by
/// whatever order the BVH happens to emit candidates in, since that
/// order is a post-subdivision permutation with no relation to input
/// face order.
pub fn find_nearest_hit(scene: &Scene, ray: &Ray, ray_length: f32) -> Option<Hit> {
    if ray_length <= 0.0 {
        return None;
    }

    let direction = ray.unit_direction();
    if direction == V3::ZERO {
        return None;
    }

    // The BVH's segment test (spec §4.1) only prunes boxes the segment's
    // two endpoints actually span; traverse against a segment extended to
    // `ray_length` so it agrees with the bound `intersect_triangle` uses,
    // rather than whatever length `ray.dest` happens to sit at.
    let traversal_ray = Ray::new(ray.origin, ray.origin + direction * ray_length);

    let mut best: Option<(f32, usize, crate::triangle::TriangleHit)> = None;
    for face_index in scene.bvh().candidates(&traversal_ray) {
        let face = &scene.faces[face_index];
        if let Some(hit) = intersect_triangle(ray, face, ray_length) {
            let better = match &best {
                None => true,
                Some((best_t, best_face_index, _)) => {
                    hit.t < *best_t || (hit.t == *best_t && face_index < *best_face_index)
                }
            };
            if better {
                best = Some((hit.t, face_index, hit));
            }
        }
    }

    best.map(|(t, face_index, _)| {
        let face = &scene.faces[face_index];
        Hit {
            t,
            point: ray.origin + ray.unit_direction() * t,
            normal: face.normal,
            material_id: face.material_id,
        }
    })
}
