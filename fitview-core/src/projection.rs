//! Perspective camera state and projection utilities

use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::error::CameraError;

/// A point projected into screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Normalized device depth in [-1, 1]
    pub depth: f32,
    /// Reciprocal of clip-space w, for perspective-correct interpolation
    pub inv_w: f32,
}

/// Perspective camera with a cached projection matrix.
///
/// Field of view is vertical and in degrees. The clip planes always satisfy
/// `0 < near < far` and the aspect ratio is always positive; setters reject
/// values that would break this.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Matrix4<f32>,
}

impl Camera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self, CameraError> {
        validate_fov(fov)?;
        validate_aspect(aspect)?;
        validate_clip_planes(near, far)?;

        let mut camera = Self {
            position: Point3::new(0.0, 10.0, 20.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov,
            aspect,
            near,
            far,
            projection: Matrix4::identity(),
        };
        camera.update_projection();
        Ok(camera)
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the vertical field of view; call [`Camera::update_projection`] afterwards
    pub fn set_fov(&mut self, fov: f32) -> Result<(), CameraError> {
        validate_fov(fov)?;
        self.fov = fov;
        Ok(())
    }

    /// Set the aspect ratio; call [`Camera::update_projection`] afterwards
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), CameraError> {
        validate_aspect(aspect)?;
        self.aspect = aspect;
        Ok(())
    }

    /// Set both clip planes; call [`Camera::update_projection`] afterwards
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> Result<(), CameraError> {
        validate_clip_planes(near, far)?;
        self.near = near;
        self.far = far;
        Ok(())
    }

    /// Orient the camera toward a point
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    /// Recompute the cached projection matrix from fov, aspect and clip planes
    pub fn update_projection(&mut self) {
        self.projection =
            Matrix4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// The projection matrix as of the last [`Camera::update_projection`]
    pub fn projection_matrix(&self) -> &Matrix4<f32> {
        &self.projection
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Project a world-space point to screen space.
    ///
    /// Returns `None` for points at or behind the camera plane. Points outside
    /// the viewport are still returned so the rasterizer can clip partially
    /// visible triangles.
    pub fn project_to_screen(
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let clip: Vector4<f32> = view_projection * point.to_homogeneous();

        // Prevent division by near-zero or negative w
        if clip.w < 1e-6 {
            return None;
        }

        let inv_w = 1.0 / clip.w;
        let ndc_x = clip.x * inv_w;
        let ndc_y = clip.y * inv_w;
        let depth = clip.z * inv_w;

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc_y) * 0.5 * height as f32,
            depth,
            inv_w,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 10.0, 20.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 45.0,
            aspect: 2.0,
            near: 0.1,
            far: 100.0,
            projection: Matrix4::new_perspective(2.0, 45.0_f32.to_radians(), 0.1, 100.0),
        }
    }
}

fn validate_fov(fov: f32) -> Result<(), CameraError> {
    if fov > 0.0 && fov < 180.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidFov(fov))
    }
}

fn validate_aspect(aspect: f32) -> Result<(), CameraError> {
    if aspect > 0.0 && aspect.is_finite() {
        Ok(())
    } else {
        Err(CameraError::InvalidAspect(aspect))
    }
}

fn validate_clip_planes(near: f32, far: f32) -> Result<(), CameraError> {
    if near > 0.0 && near < far && far.is_finite() {
        Ok(())
    } else {
        Err(CameraError::InvalidClipPlanes { near, far })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(45.0, 800.0 / 600.0, 0.1, 100.0).unwrap();
        assert!((camera.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 10.0, 20.0));
    }

    #[test]
    fn test_rejects_invalid_state() {
        let mut camera = Camera::default();
        assert_eq!(
            camera.set_clip_planes(10.0, 1.0),
            Err(CameraError::InvalidClipPlanes { near: 10.0, far: 1.0 })
        );
        assert!(camera.set_clip_planes(0.0, 1.0).is_err());
        assert!(camera.set_aspect(0.0).is_err());
        assert!(camera.set_aspect(f32::NAN).is_err());
        assert!(camera.set_fov(180.0).is_err());
        assert_eq!(camera.near(), 0.1);
        assert_eq!(camera.far(), 100.0);
        assert_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn test_projection_only_changes_on_update() {
        let mut camera = Camera::default();
        let before = *camera.projection_matrix();
        camera.set_aspect(1.0).unwrap();
        assert_eq!(*camera.projection_matrix(), before);
        camera.update_projection();
        assert_ne!(*camera.projection_matrix(), before);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut camera = Camera::default();
        camera.look_at(Point3::new(0.0, 5.0, 0.0));
        let vp = camera.view_projection();
        let projected = Camera::project_to_screen(&vp, &camera.target, 800, 400).unwrap();
        assert_relative_eq!(projected.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(projected.y, 200.0, epsilon = 1e-3);
        assert!(projected.depth > -1.0 && projected.depth < 1.0);
    }

    #[test]
    fn test_points_behind_camera_are_rejected() {
        let camera = Camera::default();
        let vp = camera.view_projection();
        let behind = Point3::new(0.0, 10.0, 40.0);
        assert!(Camera::project_to_screen(&vp, &behind, 800, 400).is_none());
    }
}
