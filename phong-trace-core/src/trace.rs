use crate::config::{EPS_BIAS, MAX_DEPTH};
use crate::hit::find_nearest_hit;
use crate::material::resolve_material;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::phong_shade;
use crate::vec::V3;

/// The recursion driver (spec §4.8). Resolves the nearest hit along
/// `origin -> dest`, shades it, and — while recursion depth and length
/// budget remain, and the material has a meaningful specular
/// contribution — spawns a mirror-reflection ray and recurses.
///
/// `length_budget` is a monotonically decreasing remaining-length
/// allowance (spec §9's recommended, termination-safe bookkeeping): each
/// recursive call subtracts the distance already travelled before
/// recursing, rather than passing the original length unchanged.
pub fn trace_ray(scene: &Scene, origin: V3, dest: V3, length_budget: f32, depth: u32) -> V3 {
    trace_ray_with_probe(scene, origin, dest, length_budget, depth, None)
}

/// Same recursion as [`trace_ray`], but when `probe` is `Some`, every hit
/// point along the primary-then-reflection chain is appended to it. This
/// is what the debug-ray visualizer (spec §4.10) uses to reuse the exact
/// recursion driver without duplicating it: it calls this once, keeps
/// the chain, and discards the color.
pub fn trace_ray_with_probe(
    scene: &Scene,
    origin: V3,
    dest: V3,
    length_budget: f32,
    depth: u32,
    mut probe: Option<&mut Vec<V3>>,
) -> V3 {
    if length_budget <= 0.0 {
        return scene.background;
    }

    let direction = (dest - origin).normalize();
    if direction == V3::ZERO {
        return scene.background;
    }

    let ray = Ray::new(origin, dest);
    let hit = match find_nearest_hit(scene, &ray, length_budget) {
        Some(hit) => hit,
        None => return scene.background,
    };

    if let Some(probe) = probe.as_deref_mut() {
        probe.push(hit.point);
    }

    let material = resolve_material(&scene.materials, hit.material_id);
    let view_dir = (origin - hit.point).normalize();
    let local_color = phong_shade(scene, hit.point, hit.normal, view_dir, &material);

    if depth >= MAX_DEPTH || material.is_specular_negligible(EPS_BIAS) {
        return local_color;
    }

    let reflect_dir = (direction - hit.normal * (2.0 * V3::dot(direction, hit.normal))).normalize();
    let reflect_origin = hit.point + hit.normal * EPS_BIAS;
    let reflect_dest = reflect_origin + reflect_dir;
    let remaining_budget = length_budget - hit.t;

    let reflected_color = trace_ray_with_probe(scene, reflect_origin, reflect_dest, remaining_budget, depth + 1, probe);

    (local_color + material.ks * reflected_color).clamp01()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RAYLENGTH;
    use crate::light::PointLight;
    use crate::material::{Material, DEFAULT_MATERIAL};
    use crate::triangle::Face;

    #[test]
    fn primary_ray_through_center_returns_lit_color_not_background() {
        let face = Face::new(
            V3(-1.0, -1.0, -5.0),
            V3(1.0, -1.0, -5.0),
            V3(0.0, 1.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let red = Material::new(V3(1.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3::ZERO, 1.0);
        let scene = Scene::build(vec![face], vec![red], vec![PointLight::new(V3::ZERO)], V3::ZERO).unwrap();
        let color = trace_ray(&scene, V3::ZERO, V3(0.0, -0.33, -5.0), RAYLENGTH, 0);
        assert!(color.x() > 0.0);
        assert_eq!(color.y(), 0.0);
        assert_eq!(color.z(), 0.0);
    }

    #[test]
    fn primary_ray_through_corner_returns_background() {
        let face = Face::new(
            V3(-1.0, -1.0, -5.0),
            V3(1.0, -1.0, -5.0),
            V3(0.0, 1.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let background = V3(0.1, 0.2, 0.3);
        let scene = Scene::build(vec![face], vec![DEFAULT_MATERIAL], vec![], background).unwrap();
        let color = trace_ray(&scene, V3::ZERO, V3(5.0, 5.0, -5.0), RAYLENGTH, 0);
        assert_eq!(color, background);
    }

    #[test]
    fn empty_mesh_would_fail_at_build_not_at_trace() {
        // Scene::build already refuses an empty mesh (spec §7); trace_ray
        // is never reachable with zero faces.
        assert!(Scene::build(vec![], vec![], vec![], V3::ZERO).is_err());
    }

    #[test]
    fn mirror_reflection_picks_up_the_reflected_surface_color() {
        // A mirror facing +z with a green wall a short distance behind the camera's
        // reflection path.
        let mirror = Face::new(
            V3(-5.0, -5.0, 0.0),
            V3(5.0, -5.0, 0.0),
            V3(0.0, 5.0, 0.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let green_wall = Face::new(
            V3(-5.0, -5.0, 5.0),
            V3(5.0, -5.0, 5.0),
            V3(0.0, 5.0, 5.0),
            V3(0.0, 0.0, -1.0),
            1,
        );
        let mirror_mat = Material::new(V3::ZERO, V3::ZERO, V3(1.0, 1.0, 1.0), 1000.0);
        let green_mat = Material::new(V3(0.0, 0.2, 0.0), V3(0.0, 1.0, 0.0), V3::ZERO, 1.0);
        let scene = Scene::build(
            vec![mirror, green_wall],
            vec![mirror_mat, green_mat],
            vec![PointLight::new(V3(0.0, 10.0, -5.0))],
            V3::ZERO,
        )
        .unwrap();

        // Ray from behind the mirror (-z) towards it; reflects back towards +z
        // into the green wall.
        let color = trace_ray(&scene, V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 0.0), 20.0, 0);
        assert!(color.y() > 0.0, "expected some green tint from the reflection, got {:?}", color);
    }

    #[test]
    fn depth_cap_terminates_a_mirror_corridor() {
        // Two parallel mirrors facing each other; without a depth cap the
        // reflection chain would never terminate.
        let mirror_a = Face::new(
            V3(-5.0, -5.0, 0.0),
            V3(5.0, -5.0, 0.0),
            V3(0.0, 5.0, 0.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let mirror_b = Face::new(
            V3(-5.0, -5.0, 10.0),
            V3(5.0, -5.0, 10.0),
            V3(0.0, 5.0, 10.0),
            V3(0.0, 0.0, -1.0),
            0,
        );
        let mirror_mat = Material::new(V3(0.01, 0.01, 0.01), V3::ZERO, V3(1.0, 1.0, 1.0), 1000.0);
        let scene = Scene::build(
            vec![mirror_a, mirror_b],
            vec![mirror_mat],
            vec![PointLight::new(V3(0.0, 10.0, 5.0))],
            V3::ZERO,
        )
        .unwrap();

        // Should terminate (not hang / stack overflow) and produce a finite,
        // in-range color.
        let color = trace_ray(&scene, V3(0.0, 0.0, -1.0), V3(0.0, 0.0, 0.0), 100.0, 0);
        assert!(color.x().is_finite() && color.y().is_finite() && color.z().is_finite());
        assert!(color.x() >= 0.0 && color.x() <= 1.0);
    }
}
