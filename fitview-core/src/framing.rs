//! Camera framing from a bounding volume.
//!
//! A perspective camera sees a height of `2 * distance * tan(fov / 2)` at a
//! given distance. [`frame_area`] solves that for the distance at which
//! `size_to_fit` exactly fills the view, then places the camera on the
//! horizontal ray from the model center toward the current camera position.

use nalgebra::{Point3, Vector3};

use crate::bounds::BoundingVolume;
use crate::error::FrameError;
use crate::orbit::OrbitControls;
use crate::projection::Camera;

/// Screen size multiplier applied to the diagonal so the model is not edge-clipped
pub const FRAME_MARGIN: f32 = 1.2;

/// Orbit dolly limit as a multiple of the diagonal
pub const MAX_DISTANCE_FACTOR: f32 = 10.0;

/// Near plane is the diagonal divided by this, far plane the diagonal times it
pub const CLIP_RANGE_FACTOR: f32 = 100.0;

/// Horizontal length below which the camera counts as directly above or below
const MIN_HORIZONTAL_LENGTH: f32 = 1e-6;

/// Camera placement computed by [`frame_area`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameFit {
    pub position: Point3<f32>,
    pub near: f32,
    pub far: f32,
    pub look_at: Point3<f32>,
}

/// Distance at which a perspective camera sees exactly `size_to_fit` vertically
pub fn fit_distance(size_to_fit: f32, fov_degrees: f32) -> Result<f32, FrameError> {
    if !(size_to_fit > 0.0 && size_to_fit.is_finite()) {
        return Err(FrameError::InvalidSize(size_to_fit));
    }
    if !(fov_degrees > 0.0 && fov_degrees < 180.0) {
        return Err(FrameError::InvalidFov(fov_degrees));
    }

    let half_size = size_to_fit * 0.5;
    let half_fov = fov_degrees.to_radians() * 0.5;
    Ok(half_size / half_fov.tan())
}

/// Unit direction from `center` toward `from`, projected onto the XZ plane.
///
/// Falls back to +Z when `from` lies directly above or below `center`. The
/// vertical component of the result is always exactly zero.
pub fn horizontal_direction(from: &Point3<f32>, center: &Point3<f32>) -> Vector3<f32> {
    let offset = from - center;
    Vector3::new(offset.x, 0.0, offset.z)
        .try_normalize(MIN_HORIZONTAL_LENGTH)
        .unwrap_or_else(Vector3::z)
}

/// Compute a camera placement that fits `size_to_fit` on screen around `bounds`.
pub fn frame_area(
    size_to_fit: f32,
    bounds: &BoundingVolume,
    camera_position: &Point3<f32>,
    fov_degrees: f32,
) -> Result<FrameFit, FrameError> {
    let diagonal = bounds.diagonal_length;
    if !(diagonal >= 0.0 && diagonal.is_finite()) {
        return Err(FrameError::InvalidBounds(diagonal));
    }

    let distance = fit_distance(size_to_fit, fov_degrees)?;
    let direction = horizontal_direction(camera_position, &bounds.center);

    Ok(FrameFit {
        position: bounds.center + direction * distance,
        near: diagonal / CLIP_RANGE_FACTOR,
        far: diagonal * CLIP_RANGE_FACTOR,
        look_at: bounds.center,
    })
}

/// Frame a loaded model: move the camera, reset its clip planes and point
/// the orbit controls at the model center.
///
/// Nothing is modified when an error is returned.
pub fn frame_model(
    bounds: &BoundingVolume,
    camera: &mut Camera,
    controls: &mut OrbitControls,
) -> Result<FrameFit, FrameError> {
    if bounds.diagonal_length == 0.0 {
        return Err(FrameError::DegenerateBounds);
    }

    let fit = frame_area(
        bounds.diagonal_length * FRAME_MARGIN,
        bounds,
        &camera.position,
        camera.fov(),
    )?;

    camera.set_clip_planes(fit.near, fit.far)?;
    camera.position = fit.position;
    camera.update_projection();
    camera.look_at(fit.look_at);

    controls.max_distance = bounds.diagonal_length * MAX_DISTANCE_FACTOR;
    controls.target = fit.look_at;
    controls.update(camera);

    log::info!(
        "framed model: center=({:.2}, {:.2}, {:.2}) diagonal={:.2} distance={:.2} near={:.3} far={:.1}",
        bounds.center.x,
        bounds.center.y,
        bounds.center.z,
        bounds.diagonal_length,
        nalgebra::distance(&fit.position, &fit.look_at),
        fit.near,
        fit.far,
    );

    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn windmill() -> BoundingVolume {
        BoundingVolume::new(Point3::new(0.0, 770.0, 0.0), 2123.65)
    }

    #[test]
    fn test_distance_fills_view_height() {
        for &fov in &[1.0_f32, 30.0, 45.0, 90.0, 120.0, 179.0] {
            for &size in &[0.01_f32, 1.0, 2548.38, 1.0e5] {
                let distance = fit_distance(size, fov).unwrap();
                let visible = 2.0 * distance * (fov.to_radians() * 0.5).tan();
                assert_relative_eq!(visible, size, max_relative = 1e-4);
            }
        }
    }

    #[test]
    fn test_windmill_scenario() {
        let bounds = windmill();
        let size = 2123.65 * FRAME_MARGIN;
        let camera = Point3::new(0.0, 10.0, 20.0);
        let fit = frame_area(size, &bounds, &camera, 45.0).unwrap();

        let expected = (size / 2.0) / 22.5_f32.to_radians().tan();
        assert_relative_eq!(fit.position, Point3::new(0.0, 770.0, expected), max_relative = 1e-5);
        assert_relative_eq!(fit.near, 21.2365, max_relative = 1e-5);
        assert_relative_eq!(fit.far, 212365.0, max_relative = 1e-5);
        assert_eq!(fit.look_at, Point3::new(0.0, 770.0, 0.0));
    }

    #[test]
    fn test_camera_stays_level_with_center() {
        let bounds = BoundingVolume::new(Point3::new(3.0, -250.0, 4.0), 10.0);
        let camera = Point3::new(-7.0, 900.0, 12.0);
        let fit = frame_area(12.0, &bounds, &camera, 60.0).unwrap();

        assert_eq!(fit.position.y, bounds.center.y);
        let distance = fit_distance(12.0, 60.0).unwrap();
        assert_relative_eq!(
            nalgebra::distance(&fit.position, &bounds.center),
            distance,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_vertical_offset_uses_fallback_axis() {
        let center = Point3::new(1.0, 5.0, -2.0);
        let above = Point3::new(1.0, 50.0, -2.0);
        let below = Point3::new(1.0, -50.0, -2.0);

        assert_eq!(horizontal_direction(&above, &center), Vector3::z());
        assert_eq!(horizontal_direction(&below, &center), Vector3::z());
        assert_eq!(horizontal_direction(&center, &center), Vector3::z());

        let bounds = BoundingVolume::new(center, 4.0);
        let fit = frame_area(4.8, &bounds, &above, 45.0).unwrap();
        assert!(fit.position.iter().all(|c| c.is_finite()));
        assert_eq!(fit.position.x, center.x);
        assert_eq!(fit.position.y, center.y);
        assert!(fit.position.z > center.z);
    }

    #[test]
    fn test_direction_has_no_vertical_component() {
        let center = Point3::new(0.0, 770.0, 0.0);
        for from in [
            Point3::new(0.0, 10.0, 20.0),
            Point3::new(-3.0, 2000.0, 0.5),
            Point3::new(1e4, -1e4, -1e4),
        ] {
            let direction = horizontal_direction(&from, &center);
            assert_eq!(direction.y, 0.0);
            assert_relative_eq!(direction.norm(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_clip_planes_scale_with_diagonal() {
        let camera = Point3::new(0.0, 0.0, 1.0);
        for &diagonal in &[1e-3_f32, 1.0, 2123.65, 1e6] {
            let bounds = BoundingVolume::new(Point3::origin(), diagonal);
            let fit = frame_area(diagonal * FRAME_MARGIN, &bounds, &camera, 45.0).unwrap();
            assert!(fit.near < fit.far);
            assert_relative_eq!(fit.near, diagonal / 100.0, max_relative = 1e-6);
            assert_relative_eq!(fit.far, diagonal * 100.0, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_zero_diagonal_does_not_produce_nan() {
        let bounds = BoundingVolume::new(Point3::new(0.0, 1.0, 0.0), 0.0);
        let fit = frame_area(1.0, &bounds, &Point3::new(0.0, 1.0, 0.0), 45.0).unwrap();
        assert!(fit.position.iter().all(|c| c.is_finite()));
        assert_eq!(fit.near, 0.0);
        assert_eq!(fit.far, 0.0);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let bounds = windmill();
        let camera = Point3::new(0.0, 10.0, 20.0);
        assert_eq!(
            frame_area(0.0, &bounds, &camera, 45.0),
            Err(FrameError::InvalidSize(0.0))
        );
        assert!(frame_area(f32::NAN, &bounds, &camera, 45.0).is_err());
        assert_eq!(
            frame_area(1.0, &bounds, &camera, 180.0),
            Err(FrameError::InvalidFov(180.0))
        );
        assert!(frame_area(1.0, &bounds, &camera, 0.0).is_err());
        let negative = BoundingVolume::new(Point3::origin(), -1.0);
        assert_eq!(
            frame_area(1.0, &negative, &camera, 45.0),
            Err(FrameError::InvalidBounds(-1.0))
        );
    }

    #[test]
    fn test_frame_area_is_idempotent() {
        let bounds = windmill();
        let camera = Point3::new(5.0, 10.0, 20.0);
        let first = frame_area(2548.38, &bounds, &camera, 45.0).unwrap();
        let second = frame_area(2548.38, &bounds, &camera, 45.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_frame_model_updates_camera_and_controls() {
        let bounds = windmill();
        let mut camera = Camera::default();
        let mut controls = OrbitControls::default();

        let fit = frame_model(&bounds, &mut camera, &mut controls).unwrap();

        assert_relative_eq!(camera.position, fit.position, epsilon = 1e-2);
        assert_eq!(camera.target, bounds.center);
        assert_eq!(camera.near(), fit.near);
        assert_eq!(camera.far(), fit.far);
        assert_eq!(controls.target, bounds.center);
        assert_relative_eq!(controls.max_distance, 21236.5, max_relative = 1e-6);

        let mut expected = Camera::default();
        expected.set_clip_planes(fit.near, fit.far).unwrap();
        expected.update_projection();
        assert_eq!(camera.projection_matrix(), expected.projection_matrix());
    }

    #[test]
    fn test_frame_model_rejects_degenerate_bounds() {
        let bounds = BoundingVolume::new(Point3::new(0.0, 3.0, 0.0), 0.0);
        let mut camera = Camera::default();
        let mut controls = OrbitControls::default();
        let before = camera.position;

        assert_eq!(
            frame_model(&bounds, &mut camera, &mut controls),
            Err(FrameError::DegenerateBounds)
        );
        assert_eq!(camera.position, before);
        assert_eq!(controls.target, OrbitControls::default().target);
    }
}
