//! Scene container, surfaces and lighting

use nalgebra::{Point3, Vector2, Vector3};

use crate::geometry::Mesh;

/// Default world size of one ground checker tile
pub const GROUND_TILE_SIZE: f32 = 200.0;

/// Decode a 0xRRGGBB color into linear [0, 1] channels
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Surface appearance of a scene object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Surface {
    /// Flat color taken from the mesh albedo
    Solid,
    /// 2x2 checker tile repeated `repeats` times across the [0, 1] uv range,
    /// sampled nearest
    Checker {
        repeats: f32,
        light: [f32; 3],
        dark: [f32; 3],
    },
}

impl Surface {
    /// Color of the surface at a texture coordinate
    pub fn sample(&self, albedo: [f32; 3], uv: Vector2<f32>) -> [f32; 3] {
        match *self {
            Surface::Solid => albedo,
            Surface::Checker { repeats, light, dark } => {
                let cu = (uv.x * repeats * 2.0).floor() as i64;
                let cv = (uv.y * repeats * 2.0).floor() as i64;
                if (cu + cv).rem_euclid(2) == 0 {
                    light
                } else {
                    dark
                }
            }
        }
    }
}

/// A mesh placed in the scene
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub mesh: Mesh,
    pub surface: Surface,
    pub double_sided: bool,
}

/// Sky/ground gradient light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphereLight {
    pub sky: [f32; 3],
    pub ground: [f32; 3],
    pub intensity: f32,
}

/// Parallel light shining from `position` toward `target`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl DirectionalLight {
    /// Unit vector pointing from the lit surface toward the light
    pub fn to_light(&self) -> Vector3<f32> {
        (self.position - self.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y)
    }
}

/// Everything the renderer draws in one frame
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: [f32; 3],
    pub objects: Vec<SceneObject>,
    pub hemisphere: Option<HemisphereLight>,
    pub directional: Vec<DirectionalLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            objects: Vec::new(),
            hemisphere: None,
            directional: Vec::new(),
        }
    }

    /// Ground plane, hemisphere light and one directional light
    pub fn with_ground(plane_size: f32, tile_size: f32) -> Self {
        let mut scene = Self::new();
        scene.add_ground(plane_size, tile_size);
        scene.hemisphere = Some(HemisphereLight {
            sky: rgb(0xB1E1FF),
            ground: rgb(0xB97A20),
            intensity: 1.0,
        });
        scene.directional.push(DirectionalLight {
            color: rgb(0xFFFFFF),
            intensity: 1.0,
            position: Point3::new(0.0, 10.0, 0.0),
            target: Point3::new(-5.0, 0.0, 0.0),
        });
        scene
    }

    pub fn add(&mut self, mesh: Mesh, surface: Surface) {
        self.objects.push(SceneObject {
            mesh,
            surface,
            double_sided: false,
        });
    }

    /// A double-sided checker plane of side `plane_size` at y = 0, with one
    /// checker tile every `tile_size` units.
    ///
    /// A non-positive or non-finite tile size falls back to
    /// [`GROUND_TILE_SIZE`].
    pub fn add_ground(&mut self, plane_size: f32, tile_size: f32) {
        let tile_size = if tile_size.is_finite() && tile_size > 0.0 {
            tile_size
        } else {
            log::warn!("invalid ground tile size {tile_size}, using {GROUND_TILE_SIZE}");
            GROUND_TILE_SIZE
        };
        let repeats = (plane_size / tile_size).max(1.0);
        self.objects.push(SceneObject {
            // float to int casts saturate, the plane clamps the cell count
            mesh: Mesh::plane(plane_size, repeats.ceil() as u32),
            surface: Surface::Checker {
                repeats,
                light: [0.75, 0.75, 0.75],
                dark: [0.25, 0.25, 0.25],
            },
            double_sided: true,
        });
    }

    /// Lit color for a surface point, each channel clamped to [0, 1].
    ///
    /// `normal` must be unit length. Double-sided surfaces are lit as if
    /// facing the light on either side.
    pub fn shade(&self, normal: &Vector3<f32>, albedo: [f32; 3], double_sided: bool) -> [f32; 3] {
        let mut light = [0.0_f32; 3];

        if let Some(hemi) = &self.hemisphere {
            let t = 0.5 * (normal.y + 1.0);
            for (c, out) in light.iter_mut().enumerate() {
                *out += (hemi.ground[c] + (hemi.sky[c] - hemi.ground[c]) * t) * hemi.intensity;
            }
        }

        for sun in &self.directional {
            let mut lambert = normal.dot(&sun.to_light());
            if double_sided {
                lambert = lambert.abs();
            }
            let lambert = lambert.max(0.0) * sun.intensity;
            for (c, out) in light.iter_mut().enumerate() {
                *out += sun.color[c] * lambert;
            }
        }

        [
            (albedo[0] * light[0]).clamp(0.0, 1.0),
            (albedo[1] * light[1]).clamp(0.0, 1.0),
            (albedo[2] * light[2]).clamp(0.0, 1.0),
        ]
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
