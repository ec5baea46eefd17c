//! Error types for framing, camera state, loading, and configuration

use thiserror::Error;

/// Errors from the frame fitter and the framing protocol
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FrameError {
    #[error("size to fit on screen must be positive and finite, got {0}")]
    InvalidSize(f32),

    #[error("vertical field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFov(f32),

    #[error("bounding volume has invalid diagonal length {0}")]
    InvalidBounds(f32),

    #[error("bounding volume has zero extent, near and far planes would collapse")]
    DegenerateBounds,

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Errors from camera setters that would break the camera invariants
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error("clip planes must satisfy 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspect(f32),

    #[error("vertical field of view must lie in (0, 180) degrees, got {0}")]
    InvalidFov(f32),
}

/// Errors from the two-stage model load
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch {path}: {source}")]
    Fetch {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse material file {path}: {source}")]
    Material {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to parse model file {path}: {source}")]
    Model {
        path: String,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model {path} contains no geometry")]
    EmptyModel { path: String },
}

/// Errors while reading a viewer configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
