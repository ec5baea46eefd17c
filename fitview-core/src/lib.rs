//! fitview core library - model framing and viewer state
//!
//! This library provides the renderer-independent part of the viewer:
//! fitting a perspective camera to a model's bounding volume, camera and
//! orbit state, the scene description, and two-stage OBJ/MTL loading.

pub mod bounds;
pub mod config;
pub mod error;
pub mod framing;
pub mod geometry;
pub mod loader;
pub mod orbit;
pub mod projection;
pub mod scene;

// Re-export commonly used types
pub use bounds::{Aabb, BoundingVolume};
pub use config::ViewerConfig;
pub use error::{CameraError, ConfigError, FrameError, LoadError};
pub use framing::{frame_area, frame_model, FrameFit};
pub use geometry::{Mesh, Triangle, Vertex};
pub use loader::{AssetSource, FsSource, LoadState, LoadedModel, MemorySource, ModelLoad};
pub use orbit::OrbitControls;
pub use projection::{Camera, ScreenPoint};
pub use scene::{Scene, Surface};
