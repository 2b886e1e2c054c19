/// Orrery Terminal Demo - star, orbiting planet and homing meteor
///
/// Controls:
///   - W/X, Up/Down: Move the camera on the Y-Z plane
///   - D/A, Right/Left: Move the camera on the X-Z plane
///   - =/+ and -: Zoom in and out
///   - Space: Launch the meteor
///   - Q/ESC: Quit
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use orrery_core::{Scene, SceneConfig};
use orrery_terminal::{run_headless, SceneMeshes, TerminalApp};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Fly a camera around a tiny solar system in your terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Scene description in RON. Mesh paths in it are relative to the file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Step the scene without drawing and print a summary
    #[arg(long)]
    headless: bool,

    /// Number of frames to simulate in headless mode
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Launch the meteor on this frame in headless mode
    #[arg(long)]
    launch_at: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log: Option<PathBuf>,
}

fn init_tracing(log: Option<&Path>, headless: bool) -> Result<()> {
    // Logging to stderr would tear the full-screen view, so it is off there by default
    let default = if log.is_some() || headless { "info" } else { "off" };
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            let fmt_layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        }
        None => {
            let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log.as_deref(), args.headless)?;
    info!("Starting Orrery");

    let (config, base) = match &args.config {
        Some(path) => {
            let config = SceneConfig::load(path)
                .with_context(|| format!("failed to load scene config {}", path.display()))?;
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            (config, base)
        }
        None => (SceneConfig::default(), PathBuf::new()),
    };
    let scene = Scene::new(&config);

    if args.headless {
        let state = run_headless(&scene, args.frames, args.launch_at);
        println!(
            "frame {}: projectile {:?} at ({:.2}, {:.2}, {:.2}), orbiting body {}",
            state.frame,
            state.projectile.phase,
            state.projectile.position.x,
            state.projectile.position.y,
            state.projectile.position.z,
            if state.orbiter_visible { "intact" } else { "destroyed" },
        );
        return Ok(());
    }

    let meshes = SceneMeshes::load(&config.mesh_paths_relative_to(&base))
        .context("failed to load scene meshes")?;

    let mut app = TerminalApp::new(scene, meshes)?;
    app.run()?;

    println!("Thank you for visiting the Orrery!");
    Ok(())
}
