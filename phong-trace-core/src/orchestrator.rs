use crate::camera::Camera;
use crate::config::RAYLENGTH;
use crate::error::RaytraceError;
use crate::image::Image;
use crate::scene::Scene;
use crate::trace::{trace_ray, trace_ray_with_probe};
use crate::vec::{V2, V3};

/// Computes the world-space primary ray endpoints for pixel `(x, y)`
/// within a `width x height` target viewport, using the camera's
/// pixel-to-world map (spec §4.9).
fn primary_ray_endpoints(camera: &(impl Camera + ?Sized), x: usize, y: usize) -> (V3, V3) {
    let origin = camera.eye();
    let dest = camera.screen_to_world(V2::new(x as f32, y as f32));
    (origin, dest)
}

/// Renders one row of the image (`y`) by casting a primary ray through
/// every pixel in that row. Exposed as a standalone unit of work so a
/// caller can parallelize across rows while sharing the read-only
/// `scene`/`camera` (spec §5); this function does not touch any other
/// row of `image`.
pub fn render_row(scene: &Scene, camera: &(impl Camera + ?Sized), y: usize, width: usize, image: &mut Image) {
    for x in 0..width {
        let (origin, dest) = primary_ray_endpoints(camera, x, y);
        let color = trace_ray(scene, origin, dest, RAYLENGTH, 0);
        image.set(x, y, color);
    }
}

/// Sequential raytrace orchestrator (spec §4.9): allocates the image,
/// casts one primary ray per pixel, and returns the completed buffer.
/// `phong-trace-cli` parallelizes this same per-row work across threads;
/// this entry point is the reference sequential form and what the core's
/// own tests exercise directly.
pub fn render(scene: &Scene, camera: &impl Camera, width: i64, height: i64) -> Result<Image, RaytraceError> {
    let mut image = Image::new(width, height)?;
    for y in 0..image.height() {
        render_row(scene, camera, y, image.width(), &mut image);
    }
    Ok(image)
}

/// The result of a single debug-ray probe (spec §4.10): the chain of hit
/// points from the primary ray through each reflection bounce, for
/// visual annotation by an interactive front end. The shaded color is
/// not part of the result — callers that want it should use
/// [`render_row`]/[`trace_ray`](crate::trace::trace_ray) directly.
#[derive(Debug, Clone, Default)]
pub struct DebugRayProbe {
    pub hit_points: Vec<V3>,
}

impl DebugRayProbe {
    pub fn first_hit(&self) -> Option<V3> {
        self.hit_points.first().copied()
    }
}

/// Computes a single ray for `pixel` using the camera's pixel-to-world
/// map and runs it through the exact recursion driver used for primary
/// rays (spec §4.10), recording every hit point along the reflection
/// chain instead of discarding them.
pub fn trace_debug_ray(scene: &Scene, camera: &impl Camera, pixel: V2) -> DebugRayProbe {
    let origin = camera.eye();
    let dest = camera.screen_to_world(pixel);
    let mut hit_points = Vec::new();
    trace_ray_with_probe(scene, origin, dest, RAYLENGTH, 0, Some(&mut hit_points));
    DebugRayProbe { hit_points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use crate::material::{Material, DEFAULT_MATERIAL};
    use crate::triangle::Face;

    struct FixedCamera {
        eye: V3,
        viewport: (f32, f32, f32, f32),
    }

    impl Camera for FixedCamera {
        fn viewport(&self) -> (f32, f32, f32, f32) {
            self.viewport
        }

        fn eye(&self) -> V3 {
            self.eye
        }

        fn screen_to_world(&self, pixel: V2) -> V3 {
            // Orthographic-ish mapping onto the z=-5 plane, [-1,1] square.
            let (x0, y0, x1, y1) = self.viewport;
            let u = (pixel.x() - x0) / (x1 - x0) * 2.0 - 1.0;
            let v = 1.0 - (pixel.y() - y0) / (y1 - y0) * 2.0;
            V3(u, v, -5.0)
        }
    }

    fn camera(width: f32, height: f32) -> FixedCamera {
        FixedCamera { eye: V3::ZERO, viewport: (0.0, 0.0, width, height) }
    }

    fn red_triangle_scene() -> Scene {
        let face = Face::new(
            V3(-1.0, -1.0, -5.0),
            V3(1.0, -1.0, -5.0),
            V3(0.0, 1.0, -5.0),
            V3(0.0, 0.0, 1.0),
            0,
        );
        let red = Material::new(V3(1.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3::ZERO, 1.0);
        Scene::build(vec![face], vec![red], vec![PointLight::new(V3::ZERO)], V3::ZERO).unwrap()
    }

    #[test]
    fn s1_center_pixel_is_red_corner_pixel_is_background() {
        let scene = red_triangle_scene();
        let cam = camera(100.0, 100.0);
        let image = render(&scene, &cam, 100, 100).unwrap();

        let center = image.get(50, 50);
        assert!(center.x() > 0.0, "expected a red tone at the center, got {:?}", center);

        let corner = image.get(0, 0);
        assert_eq!(corner, V3::ZERO);
    }

    #[test]
    fn a_camera_standing_off_from_the_geometry_still_renders_it() {
        // Mirrors the default CLI render: eye well away from a near plane
        // that itself sits well short of the mesh, relying entirely on
        // RAYLENGTH (not the primary ray's own length) to reach it.
        struct StandoffCamera;
        impl Camera for StandoffCamera {
            fn viewport(&self) -> (f32, f32, f32, f32) {
                (0.0, 0.0, 20.0, 20.0)
            }

            fn eye(&self) -> V3 {
                V3(0.0, 0.0, 10.0)
            }

            fn screen_to_world(&self, pixel: V2) -> V3 {
                let u = (pixel.x() / 20.0) * 2.0 - 1.0;
                let v = 1.0 - (pixel.y() / 20.0) * 2.0;
                // Near plane one unit in front of the eye; the mesh itself
                // sits at z=0, nine units further still.
                V3(u, v, 9.0)
            }
        }

        let face = Face::new(V3(-5.0, -5.0, 0.0), V3(5.0, -5.0, 0.0), V3(0.0, 5.0, 0.0), V3(0.0, 0.0, 1.0), 0);
        let red = Material::new(V3(1.0, 0.0, 0.0), V3(1.0, 0.0, 0.0), V3::ZERO, 1.0);
        let scene = Scene::build(vec![face], vec![red], vec![PointLight::new(V3(0.0, 10.0, 10.0))], V3::ZERO).unwrap();

        let image = render(&scene, &StandoffCamera, 20, 20).unwrap();
        let center = image.get(10, 10);
        assert!(center.x() > 0.0, "expected the standoff camera to reach the mesh, got {:?}", center);
    }

    #[test]
    fn s4_empty_mesh_scene_cannot_be_built() {
        assert!(Scene::build(vec![], vec![], vec![], V3::ZERO).is_err());
    }

    #[test]
    fn every_pixel_is_in_range_after_render() {
        let scene = red_triangle_scene();
        let cam = camera(20.0, 20.0);
        let image = render(&scene, &cam, 20, 20).unwrap();
        for y in 0..image.height() {
            for x in 0..image.width() {
                let c = image.get(x, y);
                assert!(c.x() >= 0.0 && c.x() <= 1.0);
                assert!(c.y() >= 0.0 && c.y() <= 1.0);
                assert!(c.z() >= 0.0 && c.z() <= 1.0);
            }
        }
    }

    #[test]
    fn debug_ray_reports_the_first_hit_point() {
        let scene = red_triangle_scene();
        let cam = camera(100.0, 100.0);
        let probe = trace_debug_ray(&scene, &cam, V2::new(50.0, 50.0));
        assert!(probe.first_hit().is_some());
    }

    #[test]
    fn debug_ray_on_a_miss_records_no_hits() {
        let scene = Scene::build(
            vec![Face::new(V3(-1.0, -1.0, -5.0), V3(1.0, -1.0, -5.0), V3(0.0, 1.0, -5.0), V3(0.0, 0.0, 1.0), -1)],
            vec![DEFAULT_MATERIAL],
            vec![],
            V3::ZERO,
        )
        .unwrap();
        let cam = camera(100.0, 100.0);
        let probe = trace_debug_ray(&scene, &cam, V2::new(0.0, 0.0));
        assert!(probe.hit_points.is_empty());
    }
}
