use crate::vec::V3;

/// Phong reflectance coefficients for a single material, immutable once
/// constructed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ka: V3,
    pub kd: V3,
    pub ks: V3,
    pub shininess: f32,
}

/// Substituted whenever a face's `material_id` is negative or out of
/// range of the scene's material table.
pub const DEFAULT_MATERIAL: Material = Material {
    ka: V3(0.3, 0.3, 0.3),
    kd: V3(0.8, 0.5, 0.1),
    ks: V3(1.0, 1.0, 1.0),
    shininess: 10.0,
};

impl Material {
    pub fn new(ka: V3, kd: V3, ks: V3, shininess: f32) -> Material {
        Material { ka, kd, ks, shininess }
    }

    /// Whether this material has no meaningful specular contribution,
    /// within floating-point tolerance — used by the recursion driver to
    /// skip spawning a reflection ray that would contribute nothing.
    pub fn is_specular_negligible(&self, eps: f32) -> bool {
        self.ks.is_near_zero(eps)
    }
}

/// Looks up a material by index, falling back to [`DEFAULT_MATERIAL`]
/// when `material_id` is negative or out of range.
pub fn resolve_material(materials: &[Material], material_id: i32) -> Material {
    if material_id < 0 {
        return DEFAULT_MATERIAL;
    }
    materials
        .get(material_id as usize)
        .copied()
        .unwrap_or(DEFAULT_MATERIAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_id_resolves_to_default() {
        let materials = vec![Material::new(V3::ZERO, V3::ZERO, V3::ZERO, 1.0)];
        assert_eq!(resolve_material(&materials, -1), DEFAULT_MATERIAL);
    }

    #[test]
    fn out_of_range_id_resolves_to_default() {
        let materials = vec![Material::new(V3::ZERO, V3::ZERO, V3::ZERO, 1.0)];
        assert_eq!(resolve_material(&materials, 5), DEFAULT_MATERIAL);
    }

    #[test]
    fn in_range_id_resolves_to_the_stored_material() {
        let mat = Material::new(V3(1.0, 0.0, 0.0), V3::ZERO, V3::ZERO, 2.0);
        let materials = vec![DEFAULT_MATERIAL, mat];
        assert_eq!(resolve_material(&materials, 1), mat);
    }
}
