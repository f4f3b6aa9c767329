use crate::aabb::Aabb;
use crate::config::EPS_INTERSECT;
use crate::ray::Ray;
use crate::vec::V3;

/// A single mesh triangle, immutable after construction. The loader is
/// responsible for precomputing a unit-length face normal; the core
/// never recomputes it from the vertices.
#[derive(Debug, Copy, Clone)]
pub struct Face {
    pub a: V3,
    pub b: V3,
    pub c: V3,
    pub normal: V3,
    /// Negative means "use the default material".
    pub material_id: i32,
}

impl Face {
    pub fn new(a: V3, b: V3, c: V3, normal: V3, material_id: i32) -> Face {
        Face { a, b, c, normal, material_id }
    }

    pub fn vertices(&self) -> [V3; 3] {
        [self.a, self.b, self.c]
    }

    pub fn centroid(&self) -> V3 {
        (self.a + self.b + self.c) * (1.0 / 3.0)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_vertices(&self.vertices())
    }
}

/// The result of a ray/triangle intersection.
#[derive(Debug, Copy, Clone)]
pub struct TriangleHit {
    pub t: f32,
    /// Barycentric weights `(1-u-v, u, v)` for vertices `(a, b, c)`.
    pub barycentric: (f32, f32, f32),
}

/// Möller–Trumbore ray/triangle intersection, per spec §4.4. `ray_length`
/// bounds how far along the ray a hit is still accepted; this is the
/// caller's remaining length budget, not a fixed scene constant.
///
/// Degenerate triangles (zero area, so `det` collapses to ~0) and
/// zero-length ray directions are both rejected by the `|det| < eps`
/// check and are reported as misses, never panics.
pub fn intersect_triangle(ray: &Ray, face: &Face, ray_length: f32) -> Option<TriangleHit> {
    let direction = ray.unit_direction();
    if direction == V3::ZERO {
        return None;
    }

    let edge_ab = face.b - face.a;
    let edge_ac = face.c - face.a;
    let pvec = V3::cross(direction, edge_ac);
    let det = V3::dot(edge_ab, pvec);

    if det.abs() < EPS_INTERSECT {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray.origin - face.a;
    let u = V3::dot(tvec, pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None;
    }

    let qvec = V3::cross(tvec, edge_ab);
    let v = V3::dot(direction, qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = V3::dot(edge_ac, qvec) * inv_det;
    if t <= EPS_INTERSECT || t > ray_length {
        return None;
    }

    Some(TriangleHit {
        t,
        barycentric: (1.0 - u - v, u, v),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Face {
        Face::new(
            V3(-1.0, -1.0, -5.0),
            V3(1.0, -1.0, -5.0),
            V3(0.0, 1.0, -5.0),
            V3(0.0, 0.0, 1.0),
            -1,
        )
    }

    #[test]
    fn ray_through_center_hits() {
        let face = unit_triangle();
        let ray = Ray::new(V3::ZERO, V3(0.0, -0.33, -5.0));
        let hit = intersect_triangle(&ray, &face, 10.0);
        assert!(hit.is_some());
    }

    #[test]
    fn ray_past_a_corner_misses() {
        let face = unit_triangle();
        let ray = Ray::new(V3::ZERO, V3(5.0, 5.0, -5.0));
        assert!(intersect_triangle(&ray, &face, 10.0).is_none());
    }

    #[test]
    fn ray_behind_origin_is_rejected() {
        let face = unit_triangle();
        // Direction pointing away from the triangle, at +z instead of -z.
        let ray = Ray::new(V3::ZERO, V3(0.0, -0.33, 5.0));
        assert!(intersect_triangle(&ray, &face, 10.0).is_none());
    }

    #[test]
    fn degenerate_triangle_never_hits() {
        let face = Face::new(V3::ZERO, V3::ZERO, V3(1.0, 0.0, 0.0), V3(0.0, 1.0, 0.0), -1);
        let ray = Ray::new(V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 5.0));
        assert!(intersect_triangle(&ray, &face, 10.0).is_none());
    }

    #[test]
    fn hit_beyond_ray_length_is_rejected() {
        let face = unit_triangle();
        let ray = Ray::new(V3::ZERO, V3(0.0, -0.33, -5.0));
        assert!(intersect_triangle(&ray, &face, 1.0).is_none());
    }

    #[test]
    fn barycentric_weights_sum_to_one() {
        let face = unit_triangle();
        let ray = Ray::new(V3::ZERO, V3(0.0, -0.33, -5.0));
        let hit = intersect_triangle(&ray, &face, 10.0).unwrap();
        let (w, u, v) = hit.barycentric;
        assert!((w + u + v - 1.0).abs() < 1e-4);
    }
}
