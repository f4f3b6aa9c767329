use crate::config::EPS_BIAS;
use crate::hit::find_nearest_hit;
use crate::material::Material;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vec::V3;

/// A hard-shadow test (spec §4.7): the light at `light_pos` is visible
/// from `point` iff no triangle's closed intersection with the segment
/// `(point, light_pos)` falls strictly between the endpoints. The test
/// short-circuits on the first confirmed occluder; it does not need the
/// nearest one.
pub fn is_occluded(scene: &Scene, point: V3, light_pos: V3) -> bool {
    let to_light = light_pos - point;
    let distance = to_light.length();
    if distance <= EPS_BIAS {
        return false;
    }
    let shadow_ray = Ray::new(point, light_pos);
    // Stop just short of the light itself so the light's own position
    // (or a face coplanar with it) never self-occludes.
    find_nearest_hit(scene, &shadow_ray, distance - EPS_BIAS).is_some()
}

/// Phong shading kernel (spec §4.6): ambient once, then diffuse +
/// specular per visible light, each channel clamped to `[0,1]` on
/// return. A pure function of its inputs — no hidden scene-state
/// lookups beyond the read-only shadow test — so it is safe to call
/// concurrently from every render worker.
pub fn phong_shade(scene: &Scene, point: V3, normal: V3, view_dir: V3, material: &Material) -> V3 {
    let mut color = material.ka;

    let bias_point = point + normal * EPS_BIAS;

    for light in &scene.lights {
        if is_occluded(scene, bias_point, light.position) {
            continue;
        }

        let light_dir = (light.position - point).normalize();
        let n_dot_l = V3::dot(normal, light_dir).max(0.0);
        let diffuse = material.kd * n_dot_l;

        let reflect_dir = (normal * (2.0 * n_dot_l) - light_dir).normalize();
        let r_dot_v = V3::dot(reflect_dir, view_dir).max(0.0);
        let specular = material.ks * r_dot_v.powf(material.shininess);

        color = color + diffuse + specular;
    }

    color.clamp01()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DEFAULT_MATERIAL;
    use crate::triangle::Face;

    fn red_material() -> Material {
        Material::new(V3(1.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn ambient_only_when_no_lights() {
        let face = Face::new(
            V3(-1.0, -1.0, -5.0),
            V3(1.0, -1.0, -5.0),
            V3(0.0, 1.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let scene = Scene::build(vec![face], vec![red_material()], vec![], V3::ZERO).unwrap();
        let color = phong_shade(&scene, V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 1.0), V3(0.0, 0.0, 1.0), &red_material());
        assert_eq!(color, red_material().ka);
    }

    #[test]
    fn occluded_light_contributes_nothing_beyond_ambient() {
        use crate::light::PointLight;

        let near_occluder = Face::new(
            V3(-5.0, -5.0, -3.0),
            V3(5.0, -5.0, -3.0),
            V3(0.0, 5.0, -3.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let rear = Face::new(
            V3(-5.0, -5.0, -5.0),
            V3(5.0, -5.0, -5.0),
            V3(0.0, 5.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let scene = Scene::build(
            vec![near_occluder, rear],
            vec![DEFAULT_MATERIAL],
            vec![PointLight::new(V3::ZERO)],
            V3::ZERO,
        )
        .unwrap();

        let point_on_rear = V3(0.0, 0.0, -5.0);
        let color = phong_shade(&scene, point_on_rear, V3(0.0, 0.0, 1.0), V3(0.0, 0.0, 1.0), &DEFAULT_MATERIAL);
        assert_eq!(color, DEFAULT_MATERIAL.ka.clamp01());
    }

    #[test]
    fn every_channel_is_clamped() {
        use crate::light::PointLight;

        let bright = Material::new(V3(2.0, 2.0, 2.0), V3(2.0, 2.0, 2.0), V3(2.0, 2.0, 2.0), 1.0);
        let face = Face::new(
            V3(-5.0, -5.0, -5.0),
            V3(5.0, -5.0, -5.0),
            V3(0.0, 5.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let scene = Scene::build(vec![face], vec![bright], vec![PointLight::new(V3(0.0, 0.0, 0.0))], V3::ZERO).unwrap();
        let color = phong_shade(&scene, V3(0.0, 0.0, -5.0), V3(0.0, 0.0, 1.0), V3(0.0, 0.0, 1.0), &bright);
        assert!(color.x() <= 1.0 && color.y() <= 1.0 && color.z() <= 1.0);
        assert!(color.x() >= 0.0 && color.y() >= 0.0 && color.z() >= 0.0);
    }
}
