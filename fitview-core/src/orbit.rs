//! Orbit-style camera control around a target point

use nalgebra::{Point3, Vector3};

use crate::projection::Camera;

/// Keeps the polar angle off the poles so the view never flips over
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit controller state: a look-at target and a dolly distance range
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }

    /// Rotate the camera around the target (radians).
    ///
    /// Azimuth turns around the world Y axis, polar tilts toward or away
    /// from it.
    pub fn rotate(&self, camera: &mut Camera, d_azimuth: f32, d_polar: f32) {
        let (radius, azimuth, polar) = self.spherical(camera);
        let polar = (polar + d_polar).clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        self.place(camera, radius, azimuth + d_azimuth, polar);
    }

    /// Scale the camera's distance to the target, clamped to the distance range
    pub fn dolly(&self, camera: &mut Camera, scale: f32) {
        if !(scale > 0.0 && scale.is_finite()) {
            return;
        }
        let (radius, azimuth, polar) = self.spherical(camera);
        self.place(camera, radius * scale, azimuth, polar);
    }

    /// Apply the current target and distance range to the camera
    pub fn update(&self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let radius = offset.norm();
        let clamped = self.clamp_distance(radius);
        if clamped != radius {
            let direction = offset.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::z);
            camera.position = self.target + direction * clamped;
        }
        camera.look_at(self.target);
    }

    pub fn distance(&self, camera: &Camera) -> f32 {
        nalgebra::distance(&camera.position, &self.target)
    }

    fn clamp_distance(&self, radius: f32) -> f32 {
        radius.max(self.min_distance).min(self.max_distance)
    }

    /// (radius, azimuth, polar) of the camera relative to the target
    fn spherical(&self, camera: &Camera) -> (f32, f32, f32) {
        let offset = camera.position - self.target;
        let radius = offset.norm();
        if radius <= f32::EPSILON {
            return (radius, 0.0, std::f32::consts::FRAC_PI_2);
        }
        let azimuth = offset.x.atan2(offset.z);
        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        (radius, azimuth, polar)
    }

    fn place(&self, camera: &mut Camera, radius: f32, azimuth: f32, polar: f32) {
        let radius = self.clamp_distance(radius);
        let offset = Vector3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        ) * radius;
        camera.position = self.target + offset;
        camera.look_at(self.target);
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 5.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_update_clamps_to_max_distance() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.max_distance = 5.0;
        camera.position = Point3::new(0.0, 0.0, 50.0);

        controls.update(&mut camera);

        assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, 5.0), epsilon = 1e-5);
        assert_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn test_update_keeps_position_within_range() {
        let mut camera = Camera::default();
        let controls = OrbitControls::default();
        let before = camera.position;
        controls.update(&mut camera);
        assert_eq!(camera.position, before);
        assert_eq!(camera.target, controls.target);
    }

    #[test]
    fn test_rotate_preserves_distance() {
        let mut camera = Camera::default();
        let controls = OrbitControls::default();
        let radius = controls.distance(&camera);

        controls.rotate(&mut camera, 0.7, -0.3);
        assert_relative_eq!(controls.distance(&camera), radius, max_relative = 1e-5);

        controls.rotate(&mut camera, std::f32::consts::PI, 0.0);
        assert_relative_eq!(controls.distance(&camera), radius, max_relative = 1e-5);
    }

    #[test]
    fn test_rotate_never_crosses_the_pole() {
        let mut camera = Camera::default();
        let controls = OrbitControls::new(Point3::origin());
        controls.rotate(&mut camera, 0.0, -10.0);
        let offset = camera.position - controls.target;
        assert!(offset.y > 0.0);
        assert!(offset.x.hypot(offset.z) > 0.0);
    }

    #[test]
    fn test_dolly_respects_limits() {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(Point3::origin());
        controls.min_distance = 2.0;
        controls.max_distance = 40.0;

        controls.dolly(&mut camera, 100.0);
        assert_relative_eq!(controls.distance(&camera), 40.0, max_relative = 1e-5);

        controls.dolly(&mut camera, 1e-6);
        assert_relative_eq!(controls.distance(&camera), 2.0, max_relative = 1e-5);

        let before = camera.position;
        controls.dolly(&mut camera, -1.0);
        assert_eq!(camera.position, before);
    }
}
