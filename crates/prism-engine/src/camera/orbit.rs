use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_8, PI};

/// Orbiting camera driven by wall-clock deltas.
///
/// The accumulated angle (degrees) advances by `rate * dt`; the eye orbits
/// the origin around the Y axis with a fixed downward tilt and a vertical
/// bob. `advance(0.0)` is an exact no-op.
#[derive(Debug, Clone)]
pub struct Orbit {
    angle_deg: f32,
    rate_deg_per_sec: f32,
}

impl Orbit {
    pub fn new(rate_deg_per_sec: f32) -> Self {
        Self {
            angle_deg: 0.0,
            rate_deg_per_sec,
        }
    }

    /// Advances the orbit angle by `rate * dt_secs` degrees.
    pub fn advance(&mut self, dt_secs: f32) {
        self.angle_deg += self.rate_deg_per_sec * dt_secs;
    }

    pub fn angle_deg(&self) -> f32 {
        self.angle_deg
    }

    /// Eye position: `Ry(angle) * Rx(-22.5deg) * (0, bob, 8)` where
    /// `bob = sin(angle * pi / 60) * 4`.
    pub fn eye(&self) -> Vec3 {
        let bob = (self.angle_deg * PI / 60.0).sin() * 4.0;
        let rotate =
            Mat4::from_rotation_y(self.angle_deg.to_radians()) * Mat4::from_rotation_x(-FRAC_PI_8);
        rotate.transform_point3(Vec3::new(0.0, bob, 8.0))
    }

    /// View matrix looking from the eye toward the origin, +Y up.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }
}

/// Shared projection for the cube demos: 60 degree vertical fov.
pub fn perspective(aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
    Mat4::perspective_rh(60f32.to_radians(), aspect, z_near, z_far)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_rate_times_dt() {
        let mut orbit = Orbit::new(15.0);
        orbit.advance(1.0);
        assert!((orbit.angle_deg() - 15.0).abs() < 1e-6);
        orbit.advance(0.5);
        assert!((orbit.angle_deg() - 22.5).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_is_a_no_op() {
        let mut orbit = Orbit::new(30.0);
        orbit.advance(2.0);
        let before = orbit.angle_deg();
        orbit.advance(0.0);
        assert_eq!(orbit.angle_deg(), before);
    }

    #[test]
    fn eye_at_angle_zero_is_tilted_back() {
        let orbit = Orbit::new(15.0);
        let eye = orbit.eye();
        // Rx(-pi/8) applied to (0, 0, 8): no x component, raised y, shortened z.
        assert!(eye.x.abs() < 1e-5);
        assert!((eye.y - 8.0 * (FRAC_PI_8).sin()).abs() < 1e-4);
        assert!((eye.z - 8.0 * (FRAC_PI_8).cos()).abs() < 1e-4);
    }

    #[test]
    fn eye_orbits_around_y() {
        let mut orbit = Orbit::new(1.0);
        orbit.advance(90.0);
        // One quarter turn: the (tilted) eye swings from +Z toward +X.
        // The bob term perturbs y only.
        let eye = orbit.eye();
        assert!((eye.x - 8.0 * (FRAC_PI_8).cos()).abs() < 1e-3);
        assert!(eye.z.abs() < 1e-3);
    }

    #[test]
    fn view_looks_at_origin() {
        let orbit = Orbit::new(15.0);
        let view = orbit.view();
        // The origin maps onto the view axis: x = y = 0, z = -distance.
        let origin_in_view = view.transform_point3(Vec3::ZERO);
        assert!(origin_in_view.x.abs() < 1e-5);
        assert!(origin_in_view.y.abs() < 1e-5);
        assert!((origin_in_view.z + orbit.eye().length()).abs() < 1e-4);
    }
}
