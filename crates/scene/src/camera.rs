use foundation::math::{Vec2, Vec3};

use crate::picking::Ray;

/// Default vertical field of view.
pub const DEFAULT_FOV_Y_DEG: f64 = 75.0;

/// Drawing surface size in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Perspective camera looking at a target point.
///
/// View space is right-handed: the camera looks down its local `-Z` with `+Y`
/// up, and NDC spans `[-1, 1]` on both axes with `+y` pointing up the screen.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f64,
    pub viewport: Viewport,
}

impl Camera {
    /// Camera on the `+Z` axis at `distance` from the origin, looking at it.
    pub fn orbiting_origin(distance: f64, fov_y_rad: f64, viewport: Viewport) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y_rad,
            viewport,
        }
    }

    /// Orthonormal `(right, up, forward)` basis, or `None` if degenerate.
    fn basis(&self) -> Option<(Vec3, Vec3, Vec3)> {
        let forward = (self.target - self.eye).normalized()?;
        let right = forward.cross(self.up).normalized()?;
        let up = right.cross(forward);
        Some((right, up, forward))
    }

    fn half_extents(&self) -> (f64, f64) {
        let half_h = (0.5 * self.fov_y_rad).tan();
        (half_h * self.viewport.aspect(), half_h)
    }

    /// Pixel coordinates (origin top-left) to NDC.
    pub fn ndc_from_screen(&self, pos_px: Vec2) -> Vec2 {
        Vec2::new(
            (pos_px.x / self.viewport.width) * 2.0 - 1.0,
            -(pos_px.y / self.viewport.height) * 2.0 + 1.0,
        )
    }

    pub fn screen_from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.width,
            (1.0 - ndc.y) * 0.5 * self.viewport.height,
        )
    }

    /// Ray from the eye through an NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let (right, up, forward) = self.basis()?;
        let (hx, hy) = self.half_extents();
        let dir = forward + right * (ndc.x * hx) + up * (ndc.y * hy);
        Some(Ray::new(self.eye, dir.normalized()?))
    }

    /// NDC position of a world point, or `None` if it is behind the camera.
    pub fn ndc_from_world(&self, world: Vec3) -> Option<Vec2> {
        let (right, up, forward) = self.basis()?;
        let d = world - self.eye;
        let depth = d.dot(forward);
        if depth <= 0.0 {
            return None;
        }
        let (hx, hy) = self.half_extents();
        Some(Vec2::new(
            d.dot(right) / (depth * hx),
            d.dot(up) / (depth * hy),
        ))
    }

    pub fn screen_from_world(&self, world: Vec3) -> Option<Vec2> {
        self.ndc_from_world(world).map(|ndc| self.screen_from_ndc(ndc))
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera, Viewport};
    use foundation::math::{Vec2, Vec3};

    fn camera() -> Camera {
        Camera::orbiting_origin(10.0, 75f64.to_radians(), Viewport::new(1280.0, 720.0))
    }

    #[test]
    fn screen_center_is_ndc_origin() {
        let cam = camera();
        assert_eq!(cam.ndc_from_screen(Vec2::new(640.0, 360.0)), Vec2::new(0.0, 0.0));
        assert_eq!(cam.ndc_from_screen(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(cam.screen_from_ndc(Vec2::new(1.0, -1.0)), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn center_ray_points_at_target() {
        let ray = camera().ray_from_ndc(Vec2::new(0.0, 0.0)).unwrap();
        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 10.0));
        assert!((ray.dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn world_to_ndc_inverts_ray_construction() {
        let cam = camera();
        let p = Vec3::new(-1.98, 2.75, 3.8);
        let ndc = cam.ndc_from_world(p).unwrap();
        let ray = cam.ray_from_ndc(ndc).unwrap();

        // The point must lie on the reconstructed ray.
        let t = (p - ray.origin).dot(ray.dir);
        let closest = ray.origin + ray.dir * t;
        assert!((closest - p).length() < 1e-9);
    }

    #[test]
    fn points_behind_the_eye_do_not_project() {
        assert!(camera().ndc_from_world(Vec3::new(0.0, 0.0, 12.0)).is_none());
    }
}
