use std::f32::consts::PI;

use phong_trace_core::{Camera, V2, V3};

/// A pinhole perspective camera: `look_from`/`look_at`/`fov` define the
/// view frustum, mapped onto a `width x height` pixel grid. Depth-of-field
/// (lens radius, focus distance) is not modeled here — every ray
/// originates exactly at `look_from`.
pub struct PerspectiveCamera {
    eye: V3,
    lower_left_corner: V3,
    horizontal: V3,
    vertical: V3,
    width: f32,
    height: f32,
}

impl PerspectiveCamera {
    pub fn new(look_from: V3, look_at: V3, v_fov_degrees: f32, width: f32, height: f32) -> PerspectiveCamera {
        let v_up = V3(0.0, 1.0, 0.0);
        let theta = v_fov_degrees * PI / 180.0;
        let half_height = (theta / 2.0).tan();
        let half_width = (width / height) * half_height;

        let w = (look_from - look_at).normalize();
        let u = V3::cross(v_up, w).normalize();
        let v = V3::cross(w, u);

        PerspectiveCamera {
            eye: look_from,
            lower_left_corner: look_from - u * half_width - v * half_height - w,
            horizontal: u * (2.0 * half_width),
            vertical: v * (2.0 * half_height),
            width,
            height,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn viewport(&self) -> (f32, f32, f32, f32) {
        (0.0, 0.0, self.width, self.height)
    }

    fn eye(&self) -> V3 {
        self.eye
    }

    fn screen_to_world(&self, pixel: V2) -> V3 {
        // Pixel row 0 is the top of the image; the frustum's `vertical`
        // axis sweeps bottom-to-top, so the v coordinate is flipped.
        let s = pixel.x() / self.width;
        let t = 1.0 - pixel.y() / self.height;
        self.lower_left_corner + self.horizontal * s + self.vertical * t
    }
}
