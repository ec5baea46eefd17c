//! Two-stage OBJ/MTL model loading.
//!
//! [`ModelLoad`] is an explicit state machine advanced one stage at a time by
//! the host loop: the material file first, then the geometry file with those
//! materials applied. A loaded model is handed out exactly once.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use nalgebra::Point3;

use crate::bounds::{Aabb, BoundingVolume};
use crate::error::LoadError;
use crate::geometry::{Mesh, DEFAULT_ALBEDO};

/// Resolves opaque asset paths to bytes
pub trait AssetSource {
    fn fetch(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Reads assets from the filesystem, relative to a root directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FsSource {
    fn fetch(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}

/// In-memory assets keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(path.into(), bytes.into());
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> io::Result<Vec<u8>> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

/// Geometry of a loaded model, one mesh per OBJ object or group
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub meshes: Vec<Mesh>,
    pub bounds: Aabb,
}

impl LoadedModel {
    pub fn bounding_volume(&self) -> Option<BoundingVolume> {
        self.bounds.bounding_volume()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.triangles.len()).sum()
    }
}

/// Progress of a [`ModelLoad`]
#[derive(Debug)]
pub enum LoadState {
    AwaitingMaterial,
    AwaitingModel,
    /// Model ready to be framed, see [`ModelLoad::take_loaded`]
    Loaded(LoadedModel),
    /// The loaded model has been handed to the host
    Framed,
    Failed(LoadError),
}

impl LoadState {
    /// True once no further stage will run
    pub fn is_finished(&self) -> bool {
        matches!(self, LoadState::Framed | LoadState::Failed(_))
    }
}

/// Sequential material-then-geometry load of one model
#[derive(Debug)]
pub struct ModelLoad {
    obj_path: String,
    mtl_path: Option<String>,
    materials: tobj::MTLLoadResult,
    state: LoadState,
}

impl ModelLoad {
    pub fn new(obj_path: impl Into<String>, mtl_path: Option<String>) -> Self {
        Self {
            obj_path: obj_path.into(),
            mtl_path,
            materials: Ok((Vec::new(), Default::default())),
            state: LoadState::AwaitingMaterial,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Run the next pending stage, if any.
    ///
    /// Terminal states are left untouched so a stage never runs twice.
    pub fn advance(&mut self, source: &dyn AssetSource) -> &LoadState {
        let state = std::mem::replace(&mut self.state, LoadState::Framed);
        self.state = match state {
            LoadState::AwaitingMaterial => match self.load_materials(source) {
                Ok(()) => LoadState::AwaitingModel,
                Err(e) => Self::fail(e),
            },
            LoadState::AwaitingModel => match self.load_model(source) {
                Ok(model) => {
                    log::info!(
                        "loaded {}: {} meshes, {} triangles",
                        self.obj_path,
                        model.meshes.len(),
                        model.triangle_count()
                    );
                    LoadState::Loaded(model)
                }
                Err(e) => Self::fail(e),
            },
            other => other,
        };
        &self.state
    }

    /// Advance until the load finishes or a model is ready
    pub fn run_to_completion(&mut self, source: &dyn AssetSource) -> &LoadState {
        while matches!(
            self.state,
            LoadState::AwaitingMaterial | LoadState::AwaitingModel
        ) {
            self.advance(source);
        }
        &self.state
    }

    /// Hand out the loaded model. Returns `Some` at most once.
    pub fn take_loaded(&mut self) -> Option<LoadedModel> {
        if !matches!(self.state, LoadState::Loaded(_)) {
            return None;
        }
        match std::mem::replace(&mut self.state, LoadState::Framed) {
            LoadState::Loaded(model) => Some(model),
            _ => None,
        }
    }

    fn fail(error: LoadError) -> LoadState {
        log::error!("model load failed, camera keeps its current framing: {error}");
        LoadState::Failed(error)
    }

    fn fetch(source: &dyn AssetSource, path: &str) -> Result<Vec<u8>, LoadError> {
        source.fetch(path).map_err(|e| LoadError::Fetch {
            path: path.to_string(),
            source: e,
        })
    }

    fn load_materials(&mut self, source: &dyn AssetSource) -> Result<(), LoadError> {
        let Some(path) = self.mtl_path.as_deref() else {
            log::debug!("no material file configured for {}", self.obj_path);
            return Ok(());
        };

        let bytes = Self::fetch(source, path)?;
        let materials = tobj::load_mtl_buf(&mut bytes.as_slice()).map_err(|e| LoadError::Material {
            path: path.to_string(),
            source: e,
        })?;
        log::info!("loaded {}: {} materials", path, materials.0.len());
        self.materials = Ok(materials);
        Ok(())
    }

    fn load_model(&self, source: &dyn AssetSource) -> Result<LoadedModel, LoadError> {
        let bytes = Self::fetch(source, &self.obj_path)?;
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };
        let (models, materials) =
            tobj::load_obj_buf(&mut bytes.as_slice(), &options, |_| self.materials.clone())
                .map_err(|e| LoadError::Model {
                    path: self.obj_path.clone(),
                    source: e,
                })?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("{}: materials unavailable, using default albedo: {e}", self.obj_path);
            Vec::new()
        });

        let mut bounds = Aabb::empty();
        let mut meshes = Vec::with_capacity(models.len());
        for model in models {
            for p in model.mesh.positions.chunks_exact(3) {
                bounds.extend(&Point3::new(p[0], p[1], p[2]));
            }

            let mut mesh = Mesh::from_indexed(&model.mesh.positions, &model.mesh.indices);
            mesh.albedo = model
                .mesh
                .material_id
                .and_then(|id| materials.get(id))
                .and_then(|m| m.diffuse)
                .unwrap_or(DEFAULT_ALBEDO);
            meshes.push(mesh);
        }

        if bounds.is_empty() {
            return Err(LoadError::EmptyModel {
                path: self.obj_path.clone(),
            });
        }

        Ok(LoadedModel { meshes, bounds })
    }
}
