//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector2};
use std::io::Write;
use fitview_core::{scene::SceneObject, Camera, Scene, ScreenPoint, Surface, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One rasterized character cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub character: char,
    pub color: [f32; 3],
}

impl Cell {
    const EMPTY: Cell = Cell {
        character: ' ',
        color: [0.0; 3],
    };
}

/// ASCII renderer that converts a scene to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            cells: vec![Cell::EMPTY; size],
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Reallocate the buffers when the output surface changed size.
    ///
    /// Returns true when a resize happened.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if (width, height) == (self.width, self.height) {
            return false;
        }
        *self = Self::new(width, height);
        true
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(Cell::EMPTY);
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        let view_projection = camera.view_projection();
        for object in &scene.objects {
            for triangle in &object.mesh.triangles {
                self.render_triangle(triangle, object, scene, camera, &view_projection);
            }
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        object: &SceneObject,
        scene: &Scene,
        camera: &Camera,
        view_projection: &Matrix4<f32>,
    ) {
        let Some(normal) = triangle.face_normal() else {
            return;
        };

        // Cull faces pointing away from the camera
        let to_camera = camera.position - triangle.vertices[0].position;
        if !object.double_sided && normal.dot(&to_camera) <= 0.0 {
            return;
        }

        // Project vertices to screen space
        let mut screen = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
            inv_w: 0.0,
        }; 3];
        for (out, vertex) in screen.iter_mut().zip(&triangle.vertices) {
            match Camera::project_to_screen(
                view_projection,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(point) => *out = point,
                None => return, // Triangle is clipped
            }
        }

        let albedo = object.mesh.albedo;
        let flat = match object.surface {
            Surface::Solid => Some(scene.shade(&normal, albedo, object.double_sided)),
            Surface::Checker { .. } => None,
        };

        let uvs = [
            triangle.vertices[0].uv,
            triangle.vertices[1].uv,
            triangle.vertices[2].uv,
        ];
        self.rasterize_triangle(&screen, |w| {
            flat.unwrap_or_else(|| {
                let uv = perspective_uv(&screen, &uvs, w);
                scene.shade(&normal, object.surface.sample(albedo, uv), object.double_sided)
            })
        });
    }

    fn rasterize_triangle<F>(&mut self, coords: &[ScreenPoint; 3], mut shade: F)
    where
        F: FnMut((f32, f32, f32)) -> [f32; 3],
    {
        let [v0, v1, v2] = *coords;

        // Bounding box, clipped to screen bounds
        let min_x = (v0.x.min(v1.x).min(v2.x).floor().max(0.0)) as i64;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor().max(0.0)) as i64;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                // Interpolate depth
                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    let color = shade((w0, w1, w2));
                    self.cells[idx] = Cell {
                        character: ramp_char(color),
                        color,
                    };
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for (y, row) in self.cells.chunks(self.width.max(1)).enumerate() {
            for cell in row {
                writer.queue(SetForegroundColor(terminal_color(cell.color)))?;
                writer.queue(Print(cell.character))?;
            }
            // No newline after the last row, it would scroll the screen
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Character for a shaded color, by relative luminance
fn ramp_char(color: [f32; 3]) -> char {
    let luminance = 0.2126 * color[0] + 0.7152 * color[1] + 0.0722 * color[2];
    let index = (luminance.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    // Lit geometry never disappears into the background
    LUMINOSITY_RAMP[index.clamp(1, LUMINOSITY_RAMP.len() - 1)]
}

fn terminal_color(color: [f32; 3]) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color[0]),
        g: channel(color[1]),
        b: channel(color[2]),
    }
}

/// Texture coordinate at barycentric weights, corrected for perspective
fn perspective_uv(
    screen: &[ScreenPoint; 3],
    uvs: &[Vector2<f32>; 3],
    (w0, w1, w2): (f32, f32, f32),
) -> Vector2<f32> {
    let a = w0 * screen[0].inv_w;
    let b = w1 * screen[1].inv_w;
    let c = w2 * screen[2].inv_w;
    let sum = a + b + c;
    if sum <= f32::EPSILON {
        return uvs[0];
    }
    (uvs[0] * a + uvs[1] * b + uvs[2] * c) / sum
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
