//! fitview web - camera framing for browser viewers
//!
//! Exposes the frame fitter to a page that renders with its own WebGL
//! engine: the page hands over the loaded model's bounding box and the
//! camera's current position and field of view, applies the returned
//! placement, and calls the resize helpers from its animation frame.

use fitview_core::framing::{self, FRAME_MARGIN, MAX_DISTANCE_FACTOR};
use fitview_core::{Aabb, BoundingVolume, FrameError};
use nalgebra::Point3;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// Camera placement returned to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramedCamera {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub near: f32,
    pub far: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub target_z: f32,
    /// Orbit controller dolly limit
    pub max_distance: f32,
}

impl FramedCamera {
    fn from_fit(fit: &framing::FrameFit, bounds: &BoundingVolume) -> Self {
        Self {
            x: fit.position.x,
            y: fit.position.y,
            z: fit.position.z,
            near: fit.near,
            far: fit.far,
            target_x: fit.look_at.x,
            target_y: fit.look_at.y,
            target_z: fit.look_at.z,
            max_distance: bounds.diagonal_length * MAX_DISTANCE_FACTOR,
        }
    }
}

/// Frame an area of `size_to_fit` around a bounding volume.
///
/// Throws for a zero diagonal, which would give a zero clip range.
#[wasm_bindgen(js_name = frameArea)]
#[allow(clippy::too_many_arguments)]
pub fn frame_area(
    size_to_fit: f32,
    diagonal_length: f32,
    center_x: f32,
    center_y: f32,
    center_z: f32,
    camera_x: f32,
    camera_y: f32,
    camera_z: f32,
    fov: f32,
) -> Result<FramedCamera, JsValue> {
    let bounds = BoundingVolume::new(Point3::new(center_x, center_y, center_z), diagonal_length);
    let camera = Point3::new(camera_x, camera_y, camera_z);
    fit_area(size_to_fit, &bounds, &camera, fov).map_err(to_js)
}

/// Frame a loaded model from its box corners, with the default margin
#[wasm_bindgen(js_name = frameBox)]
#[allow(clippy::too_many_arguments)]
pub fn frame_box(
    min_x: f32,
    min_y: f32,
    min_z: f32,
    max_x: f32,
    max_y: f32,
    max_z: f32,
    camera_x: f32,
    camera_y: f32,
    camera_z: f32,
    fov: f32,
) -> Result<FramedCamera, JsValue> {
    let aabb = Aabb::from_points(&[
        Point3::new(min_x, min_y, min_z),
        Point3::new(max_x, max_y, max_z),
    ]);
    let camera = Point3::new(camera_x, camera_y, camera_z);
    fit_box(&aabb, &camera, fov).map_err(to_js)
}

/// Resize the canvas drawing buffer to its displayed size.
///
/// Returns true when the buffer changed, in which case the caller updates
/// the camera aspect from [`display_aspect`] and recomputes its projection.
#[wasm_bindgen(js_name = resizeCanvasToDisplaySize)]
pub fn resize_canvas_to_display_size(canvas: &HtmlCanvasElement) -> bool {
    let width = canvas.client_width().max(0) as u32;
    let height = canvas.client_height().max(0) as u32;
    if !needs_resize((canvas.width(), canvas.height()), (width, height)) {
        return false;
    }
    canvas.set_width(width);
    canvas.set_height(height);
    log::debug!("canvas resized to {width}x{height}");
    true
}

/// Displayed width over displayed height, `undefined` for a collapsed canvas
#[wasm_bindgen(js_name = displayAspect)]
pub fn display_aspect(canvas: &HtmlCanvasElement) -> Option<f32> {
    aspect_ratio(canvas.client_width(), canvas.client_height())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(())
}

fn to_js(error: FrameError) -> JsValue {
    log::error!("framing failed: {error}");
    JsValue::from_str(&error.to_string())
}

fn fit_area(
    size_to_fit: f32,
    bounds: &BoundingVolume,
    camera: &Point3<f32>,
    fov: f32,
) -> Result<FramedCamera, FrameError> {
    // near = far = 0 is not a usable clip range for the page camera
    if bounds.diagonal_length == 0.0 {
        return Err(FrameError::DegenerateBounds);
    }
    let fit = framing::frame_area(size_to_fit, bounds, camera, fov)?;
    Ok(FramedCamera::from_fit(&fit, bounds))
}

fn fit_box(aabb: &Aabb, camera: &Point3<f32>, fov: f32) -> Result<FramedCamera, FrameError> {
    let bounds = aabb.bounding_volume().ok_or(FrameError::DegenerateBounds)?;
    fit_area(bounds.diagonal_length * FRAME_MARGIN, &bounds, camera, fov)
}

fn needs_resize(buffer: (u32, u32), display: (u32, u32)) -> bool {
    buffer != display
}

fn aspect_ratio(width: i32, height: i32) -> Option<f32> {
    (width > 0 && height > 0).then(|| width as f32 / height as f32)
}
