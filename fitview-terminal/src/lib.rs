//! Terminal host for the fitview model viewer

use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use fitview_core::{
    frame_model, Aabb, AssetSource, BoundingVolume, Camera, LoadState, Mesh, ModelLoad,
    OrbitControls, Scene, Surface, ViewerConfig,
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Orbit step per key press, in radians
const ROTATE_STEP: f32 = 0.1;

/// Dolly scale per key press
const DOLLY_STEP: f32 = 1.1;

/// Side length of the stand-in cube shown when no model is configured
const DEMO_CUBE_SIZE: f32 = 400.0;

/// Main application struct for terminal model viewing.
///
/// Owns all mutable viewer state. The loader is advanced from the frame
/// loop, so framing happens once on the same thread that renders.
pub struct TerminalApp {
    config: ViewerConfig,
    source: Box<dyn AssetSource>,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    renderer: AsciiRenderer,
    load: Option<ModelLoad>,
    bounds: Option<BoundingVolume>,
    status: String,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Create an app sized to the current terminal
    pub fn new(config: ViewerConfig, source: Box<dyn AssetSource>) -> Result<Self> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, source, width as usize, height as usize)
    }

    pub fn with_size(
        config: ViewerConfig,
        source: Box<dyn AssetSource>,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        let (camera, controls) = config
            .camera
            .build(cell_aspect_ratio(width, height, config.render.cell_aspect))?;
        let scene = Scene::with_ground(config.ground.size, config.ground.tile);

        let load = config
            .model
            .obj
            .as_ref()
            .map(|obj| ModelLoad::new(obj.clone(), config.model.mtl.clone()));

        let mut app = Self {
            config,
            source,
            scene,
            camera,
            controls,
            renderer: AsciiRenderer::new(width, height),
            load,
            bounds: None,
            status: String::new(),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };

        if app.load.is_none() {
            log::info!("no model configured, showing demo cube");
            let cube = demo_cube();
            let bounds = Aabb::from_meshes([&cube]).bounding_volume();
            app.add_model(vec![cube], bounds);
        } else {
            app.status = "loading material".to_string();
        }

        Ok(app)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        let target_frame_time = Duration::from_millis(1000 / u64::from(self.config.render.fps.max(1)));

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Update
            self.advance_load();
            let (width, height) = terminal::size()?;
            self.sync_size(width as usize, height as usize)?;

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Run one pending load stage and frame the model once it is ready
    pub fn advance_load(&mut self) {
        let Some(load) = self.load.as_mut() else {
            return;
        };
        if load.state().is_finished() {
            return;
        }

        match load.advance(self.source.as_ref()) {
            LoadState::AwaitingModel => self.status = "loading model".to_string(),
            LoadState::Failed(e) => self.status = format!("load failed: {e}"),
            _ => {}
        }

        if let Some(model) = load.take_loaded() {
            let bounds = model.bounding_volume();
            self.add_model(model.meshes, bounds);
        }
    }

    /// Match the render buffers and camera aspect to the output size.
    ///
    /// Returns true when the size changed.
    pub fn sync_size(&mut self, width: usize, height: usize) -> Result<bool> {
        if !self.renderer.resize(width, height) {
            return Ok(false);
        }
        let aspect = cell_aspect_ratio(width, height, self.config.render.cell_aspect);
        self.camera.set_aspect(aspect)?;
        self.camera.update_projection();
        log::debug!("resized to {width}x{height}, aspect {aspect:.3}");
        Ok(true)
    }

    fn add_model(&mut self, meshes: Vec<Mesh>, bounds: Option<BoundingVolume>) {
        for mesh in meshes {
            self.scene.add(mesh, Surface::Solid);
        }
        self.bounds = bounds;
        if self.bounds.is_none() {
            log::error!("model has no vertices to frame");
            self.status = "could not frame model: no vertices".to_string();
            return;
        }
        self.reframe();
    }

    /// Fit the camera to the current model, if one is loaded
    pub fn reframe(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        match frame_model(&bounds, &mut self.camera, &mut self.controls) {
            Ok(_) => self.status = format!("framed, diagonal {:.1}", bounds.diagonal_length),
            Err(e) => {
                log::error!("could not frame model: {e}");
                self.status = format!("could not frame model: {e}");
            }
        }
    }

    fn handle_input(&mut self) -> Result<()> {
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Release {
                self.handle_key(code);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.controls.rotate(&mut self.camera, -ROTATE_STEP, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.controls.rotate(&mut self.camera, ROTATE_STEP, 0.0);
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.controls.rotate(&mut self.camera, 0.0, -ROTATE_STEP);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.controls.rotate(&mut self.camera, 0.0, ROTATE_STEP);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.controls.dolly(&mut self.camera, 1.0 / DOLLY_STEP);
            }
            KeyCode::Char('-') => {
                self.controls.dolly(&mut self.camera, DOLLY_STEP);
            }
            KeyCode::Char('f') => self.reframe(),
            _ => {}
        }
    }

    fn render(&mut self) -> Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render scene
        self.renderer.render_scene(&self.scene, &self.camera);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "fitview | FPS: {:.1} | {} | Arrows/WASD=Orbit +/-=Dolly F=Frame Q=Quit",
                self.fps, self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Aspect ratio of a character grid, corrected for non-square cells
pub fn cell_aspect_ratio(width: usize, height: usize, cell_aspect: f32) -> f32 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32 * cell_aspect.max(f32::EPSILON);
    width / height
}

/// Cube resting on the ground plane
fn demo_cube() -> Mesh {
    let mut cube = Mesh::cube(DEMO_CUBE_SIZE);
    for triangle in &mut cube.triangles {
        for vertex in &mut triangle.vertices {
            vertex.position.y += DEMO_CUBE_SIZE / 2.0;
        }
    }
    cube.albedo = [0.9, 0.6, 0.3];
    cube
}
