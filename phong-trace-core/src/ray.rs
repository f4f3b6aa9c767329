use crate::vec::V3;

/// A ray (or a finite segment, when used with the BVH/AABB tests) from
/// `origin` towards `dest`.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: V3,
    pub dest: V3,
}

impl Ray {
    pub fn new(origin: V3, dest: V3) -> Ray {
        Ray { origin, dest }
    }

    pub fn direction(&self) -> V3 {
        self.dest - self.origin
    }

    pub fn unit_direction(&self) -> V3 {
        self.direction().normalize()
    }

    pub fn point_at_parameter(&self, t: f32) -> V3 {
        self.origin + self.unit_direction() * t
    }
}
