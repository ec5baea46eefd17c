//! fitview terminal viewer
//!
//! Loads an OBJ/MTL model, frames the camera to it and renders the scene as
//! ASCII art. Without a model a demo cube is shown.
//! Controls:
//!   - Arrow Keys / WASD: Orbit around the model
//!   - +/-: Dolly in and out
//!   - F: Frame the model again
//!   - Q/ESC: Quit

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fitview_core::{FsSource, ViewerConfig};
use fitview_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "fitview-terminal", about = "Frame and view an OBJ model in the terminal")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OBJ geometry file, overrides the configuration
    #[arg(long)]
    obj: Option<String>,

    /// MTL material file, overrides the configuration
    #[arg(long)]
    mtl: Option<String>,

    /// Directory model paths are resolved against
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Log file, the terminal itself is taken by the viewer
    #[arg(long, default_value = "fitview.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if args.obj.is_some() {
        config.model.obj = args.obj;
    }
    if args.mtl.is_some() {
        config.model.mtl = args.mtl;
    }

    log::info!(
        "starting viewer: model={:?} material={:?}",
        config.model.obj,
        config.model.mtl
    );

    let source = FsSource::new(args.assets);
    let mut app = TerminalApp::new(config, Box::new(source))?;
    app.run()
}
