use crate::config::EPS_INTERSECT;
use crate::ray::Ray;
use crate::vec::V3;

/// An axis-aligned bounding box. Mutable only while being assembled by
/// the BVH builder; every other consumer treats it as a sealed value.
#[derive(Debug, Copy, Clone)]
pub struct Aabb {
    pub min: V3,
    pub max: V3,
}

impl Aabb {
    /// The box that owns no geometry: every axis has `min > max`, which
    /// makes `is_empty` true and makes it the identity element for `union`.
    pub fn empty() -> Aabb {
        Aabb {
            min: V3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: V3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_min_max(min: V3, max: V3) -> Aabb {
        Aabb { min, max }
    }

    /// The box enclosing every vertex in `vertices`. Panics if the slice
    /// is empty — callers must never build an AABB from zero geometry.
    pub fn from_vertices(vertices: &[V3]) -> Aabb {
        let mut aabb = Aabb::empty();
        for &v in vertices {
            aabb.expand_to_contain(v);
        }
        aabb
    }

    pub fn expand_to_contain(&mut self, v: V3) {
        self.min = V3::min(self.min, v);
        self.max = V3::max(self.max, v);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: V3::min(self.min, other.min),
            max: V3::max(self.max, other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x() > self.max.x() || self.min.y() > self.max.y() || self.min.z() > self.max.z()
    }

    pub fn contains_point_inclusive(&self, p: V3) -> bool {
        p.x() >= self.min.x()
            && p.x() <= self.max.x()
            && p.y() >= self.min.y()
            && p.y() <= self.max.y()
            && p.z() >= self.min.z()
            && p.z() <= self.max.z()
    }

    /// Longest axis of the box, as an index 0=x, 1=y, 2=z. Used by the BVH
    /// builder's fixed midpoint-split policy.
    pub fn longest_axis(&self) -> usize {
        let extent = self.max - self.min;
        let ext = [extent.x(), extent.y(), extent.z()];
        let mut axis = 0;
        for i in 1..3 {
            if ext[i] > ext[axis] {
                axis = i;
            }
        }
        axis
    }

    pub fn midpoint(&self, axis: usize) -> f32 {
        let lo = [self.min.x(), self.min.y(), self.min.z()][axis];
        let hi = [self.max.x(), self.max.y(), self.max.z()][axis];
        lo + (hi - lo) * 0.5
    }

    /// Segment-versus-AABB test, per Ericson's "Real-Time Collision
    /// Detection" (the slab-free separating-axis formulation). `p` and
    /// `q` are the segment endpoints (ray origin and the far end of the
    /// tested length). May return true for segments that only graze the
    /// box without reaching a contained triangle; must never return
    /// false for a segment whose closed interior intersects the box
    /// interior.
    pub fn hit_segment(&self, p: V3, q: V3) -> bool {
        let e = self.max - self.min;
        let d = q - p;
        let m = V3::new(
            p.x() + q.x() - self.min.x() - self.max.x(),
            p.y() + q.y() - self.min.y() - self.max.y(),
            p.z() + q.z() - self.min.z() - self.max.z(),
        );

        // Separating axis on box faces.
        if m.x().abs() > e.x() + d.x().abs() {
            return false;
        }
        if m.y().abs() > e.y() + d.y().abs() {
            return false;
        }
        if m.z().abs() > e.z() + d.z().abs() {
            return false;
        }

        // Separating axes along edge/edge cross products.
        let ad = V3::new(
            d.x().abs() + EPS_INTERSECT,
            d.y().abs() + EPS_INTERSECT,
            d.z().abs() + EPS_INTERSECT,
        );

        if (m.y() * d.z() - m.z() * d.y()).abs() > e.y() * ad.z() + e.z() * ad.y() {
            return false;
        }
        if (m.z() * d.x() - m.x() * d.z()).abs() > e.z() * ad.x() + e.x() * ad.z() {
            return false;
        }
        if (m.x() * d.y() - m.y() * d.x()).abs() > e.x() * ad.y() + e.y() * ad.x() {
            return false;
        }

        true
    }

    pub fn hit_ray(&self, ray: &Ray) -> bool {
        self.hit_segment(ray.origin, ray.dest)
    }
}
