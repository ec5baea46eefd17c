//! Viewer configuration, loaded from TOML.
//!
//! Every section and field is optional; missing values take the defaults
//! below.

use std::path::Path;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{CameraError, ConfigError};
use crate::orbit::OrbitControls;
use crate::projection::Camera;
use crate::scene::GROUND_TILE_SIZE;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub ground: GroundConfig,
    pub render: RenderConfig,
}

/// Initial camera and orbit target, before any model is framed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            position: [0.0, 10.0, 20.0],
            target: [0.0, 5.0, 0.0],
        }
    }
}

impl CameraConfig {
    /// Camera and orbit controls in their pre-load state
    pub fn build(&self, aspect: f32) -> Result<(Camera, OrbitControls), CameraError> {
        let mut camera = Camera::new(self.fov, aspect, self.near, self.far)?;
        camera.position = Point3::from(self.position);
        let controls = OrbitControls::new(Point3::from(self.target));
        controls.update(&mut camera);
        Ok((camera, controls))
    }
}

/// Model files, resolved by the asset source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub obj: Option<String>,
    pub mtl: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroundConfig {
    /// Side length of the square ground plane
    pub size: f32,
    /// World size of one checker tile
    pub tile: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 4000.0,
            tile: GROUND_TILE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Target frames per second
    pub fps: u32,
    /// Height of a terminal character cell divided by its width
    pub cell_aspect: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_aspect: 2.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
