/// Terminal front-end for the orrery scene
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use orrery_core::config::MeshPaths;
use orrery_core::{
    load_obj, FrameOutput, InputSignal, InputSnapshot, Mesh, ObjError, Scene, SceneState,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

pub mod input;
pub mod renderer;

pub use renderer::{AsciiRenderer, Shading};

/// Geometry for the three bodies, loaded once at startup
pub struct SceneMeshes {
    pub star: Mesh,
    pub orbiter: Mesh,
    pub projectile: Mesh,
}

impl SceneMeshes {
    pub fn load(paths: &MeshPaths) -> Result<Self, ObjError> {
        Ok(Self {
            star: load_obj(&paths.star)?,
            orbiter: load_obj(&paths.orbiter)?,
            projectile: load_obj(&paths.projectile)?,
        })
    }
}

/// Terminal cells are roughly twice as tall as they are wide. A collapsed
/// terminal still yields a positive ratio.
fn cell_aspect(width: u16, height: u16) -> f32 {
    width.max(1) as f32 / (2.0 * height.max(1) as f32)
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    state: SceneState,
    meshes: SceneMeshes,
    renderer: AsciiRenderer,
    input: InputSnapshot,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(scene: Scene, meshes: SceneMeshes) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        let mut state = scene.initial_state();
        state.camera.aspect = cell_aspect(width, height);

        Ok(Self {
            scene,
            state,
            meshes,
            renderer: AsciiRenderer::new(width as usize, height as usize),
            input: InputSnapshot::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target
        info!("Entering frame loop");

        while self.state.running {
            let frame_start = Instant::now();

            // Input sampled now is applied after this frame's update
            self.poll_input()?;
            let (state, frame) = self.scene.step(self.state.clone(), &self.input);
            self.state = state;
            self.input.clear();

            self.render(&frame)?;

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

        info!(frames = self.state.frame, "Frame loop finished");
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(signal) = input::signal_for(&key) {
                        self.input.press(signal);
                    }
                }
                Event::Resize(width, height) => {
                    let size = (width as usize, height as usize);
                    if size != (self.renderer.width(), self.renderer.height()) {
                        debug!(width, height, "Terminal resized");
                        self.renderer = AsciiRenderer::new(size.0, size.1);
                        self.state.camera.aspect = cell_aspect(width, height);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &FrameOutput) -> io::Result<()> {
        let light = Shading::LitFrom(self.scene.star);

        // Clear renderer
        self.renderer.clear();

        self.renderer
            .render_mesh(&self.meshes.star, &frame.star, Shading::Emissive, Color::Yellow);
        self.renderer
            .render_mesh(&self.meshes.orbiter, &frame.orbiter, light, Color::Cyan);
        self.renderer
            .render_mesh(&self.meshes.projectile, &frame.projectile, light, Color::Red);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let status = format!(
            "Orrery | FPS: {:.1} | Frame {} | Projectile: {:?}{}",
            self.fps,
            frame.frame,
            self.state.projectile.phase,
            if frame.draw_orbiter() { "" } else { " | Planet destroyed" },
        );
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(status),
            cursor::MoveTo(0, 1),
            SetForegroundColor(Color::DarkGrey),
            Print(input::CONTROLS),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Step the scene without a terminal, optionally launching the projectile at
/// frame `launch_at`. Returns the final state.
pub fn run_headless(scene: &Scene, frames: u64, launch_at: Option<u64>) -> SceneState {
    let mut state = scene.initial_state();
    let mut phase = state.projectile.phase;

    for _ in 0..frames {
        let mut input = InputSnapshot::new();
        if launch_at == Some(state.frame + 1) {
            input.press(InputSignal::LaunchProjectile);
        }

        let (next, frame) = scene.step(state, &input);
        state = next;

        trace!(
            frame = frame.frame,
            orbit_angle = state.orbit.orbit_angle,
            projectile = ?state.projectile.position,
            "Frame"
        );
        if state.projectile.phase != phase {
            info!(frame = frame.frame, from = ?phase, to = ?state.projectile.phase, "Projectile phase changed");
            phase = state.projectile.phase;
        }
        if frame.quit {
            break;
        }
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_core::ProjectilePhase;

    #[test]
    fn test_headless_run_counts_frames() {
        let scene = Scene::default();
        let state = run_headless(&scene, 50, None);
        assert_eq!(state.frame, 50);
        assert_eq!(state.projectile.phase, ProjectilePhase::Idle);
    }

    #[test]
    fn test_headless_launch_returns_projectile() {
        let scene = Scene::default();
        let state = run_headless(&scene, 160, Some(1));
        assert_eq!(state.projectile.phase, ProjectilePhase::JustReturned);
        assert!(state.orbiter_visible);
    }

    #[test]
    fn test_cell_aspect_compensates_tall_cells() {
        assert!((cell_aspect(80, 20) - 2.0).abs() < 1e-6);
        assert!(cell_aspect(80, 0).is_finite());
    }

    #[test]
    fn test_collapsed_terminal_still_steps() {
        for (width, height) in [(0, 24), (0, 0), (80, 0)] {
            let aspect = cell_aspect(width, height);
            assert!(orrery_core::is_valid_aspect(aspect), "{width}x{height}");

            let scene = Scene::default();
            let mut state = scene.initial_state();
            state.camera.aspect = aspect;
            let (_, frame) = scene.step(state, &InputSnapshot::new());
            assert!(frame.projection.iter().all(|v| v.is_finite()));
        }
    }
}
