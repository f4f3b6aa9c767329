use crate::bvh::Bvh;
use crate::error::RaytraceError;
use crate::light::PointLight;
use crate::material::Material;
use crate::triangle::Face;
use crate::vec::V3;

/// The immutable, read-only-during-trace bundle every ray (primary,
/// shadow, reflection) is traced against. Built once per mesh load and
/// shared across every worker thread (spec §5).
pub struct Scene {
    pub faces: Vec<Face>,
    pub materials: Vec<Material>,
    pub lights: Vec<PointLight>,
    pub background: V3,
    bvh: Bvh,
}

impl Scene {
    /// Fails if `faces` is empty (spec §7); an empty light set is valid.
    pub fn build(
        faces: Vec<Face>,
        materials: Vec<Material>,
        lights: Vec<PointLight>,
        background: V3,
    ) -> Result<Scene, RaytraceError> {
        let bvh = Bvh::build(&faces)?;
        Ok(Scene { faces, materials, lights, background, bvh })
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }
}
