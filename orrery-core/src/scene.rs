/// Per-frame scene update: orbit, projectile, collision, camera input
use nalgebra::{Matrix4, Point3};
use tracing::{debug, info};

use crate::camera::{Camera, Direction};
use crate::config::SceneConfig;
use crate::input::{InputSignal, InputSnapshot};
use crate::orbit::{Orbit, OrbitState};
use crate::projectile::{HomingRules, Projectile};
use crate::transform::Transform;

/// Everything that changes from one frame to the next
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub frame: u64,
    pub orbit: OrbitState,
    pub projectile: Projectile,
    pub camera: Camera,
    /// Cleared for good when the projectile hits the orbiting body
    pub orbiter_visible: bool,
    /// Cleared by the quit signal
    pub running: bool,
}

/// Matrices and visibility of one body for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub model: Matrix4<f32>,
    /// `projection * view * model`
    pub mvp: Matrix4<f32>,
    pub visible: bool,
}

/// What the renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub frame: u64,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub star: BodyFrame,
    pub orbiter: BodyFrame,
    pub projectile: BodyFrame,
    pub quit: bool,
}

impl FrameOutput {
    pub fn draw_orbiter(&self) -> bool {
        self.orbiter.visible
    }

    pub fn draw_projectile(&self) -> bool {
        self.projectile.visible
    }
}

/// The fixed parts of the scene: star, orbit, projectile rules and the
/// camera's starting pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub star: Point3<f32>,
    pub orbit: Orbit,
    pub rules: HomingRules,
    pub camera: Camera,
}

impl Scene {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            star: Point3::origin(),
            orbit: Orbit::from_config(&config.orbit),
            rules: HomingRules::from_config(&config.projectile),
            camera: Camera::from_config(&config.camera),
        }
    }

    /// State before the first frame; the projectile spawns at the camera
    pub fn initial_state(&self) -> SceneState {
        SceneState {
            frame: 0,
            orbit: self.orbit.initial_state(),
            projectile: Projectile::new(self.camera.position),
            camera: self.camera.clone(),
            orbiter_visible: true,
            running: true,
        }
    }

    /// Advance the scene by one frame.
    ///
    /// Motion and collisions are resolved first and the frame's matrices are
    /// built from the resulting state. Input is applied last, so it shows up in
    /// the next frame.
    pub fn step(&self, mut state: SceneState, input: &InputSnapshot) -> (SceneState, FrameOutput) {
        state.frame += 1;

        state.orbit.advance(self.orbit.step);
        let orbiter_model = self.orbit.model_matrix(&state.orbit);
        let orbiter_position = Transform::origin_of(&orbiter_model);

        let dock = state.camera.position;
        state.projectile.update(&self.rules, &self.star, &dock);
        if state.projectile.check_collision(&self.rules, &orbiter_position) {
            info!(frame = state.frame, "Projectile destroyed the orbiting body");
            state.orbiter_visible = false;
        }

        let view = state.camera.view_matrix();
        let projection = state.camera.projection_matrix();
        let body = |model: Matrix4<f32>, visible: bool| BodyFrame {
            model,
            mvp: Transform::mvp_matrix(&model, &view, &projection),
            visible,
        };
        let star = body(Matrix4::identity(), true);
        let orbiter = body(orbiter_model, state.orbiter_visible);
        let projectile = body(
            state.projectile.model_matrix(&self.rules),
            state.projectile.is_drawn(),
        );

        self.apply_input(&mut state, input);

        let frame = FrameOutput {
            frame: state.frame,
            view,
            projection,
            star,
            orbiter,
            projectile,
            quit: !state.running,
        };
        (state, frame)
    }

    fn apply_input(&self, state: &mut SceneState, input: &InputSnapshot) {
        for &signal in input.signals() {
            match signal {
                InputSignal::LaunchProjectile => {
                    state.projectile.launch();
                }
                InputSignal::Rotate(plane, direction) => state.camera.rotate(plane, direction),
                InputSignal::ZoomIn => state.camera.zoom(Direction::Positive),
                InputSignal::ZoomOut => state.camera.zoom(Direction::Negative),
                InputSignal::Quit => {
                    info!(frame = state.frame, "Quit requested");
                    state.running = false;
                }
            }
        }

        if !input.is_empty() {
            debug!(frame = state.frame, camera = ?state.camera.position, "Applied input");
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(&SceneConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Plane;
    use crate::projectile::ProjectilePhase;

    fn run(scene: &Scene, mut state: SceneState, frames: u64, launch_at: Option<u64>) -> (SceneState, FrameOutput) {
        let mut output = None;
        for _ in 0..frames {
            let mut input = InputSnapshot::new();
            if launch_at == Some(state.frame + 1) {
                input.press(InputSignal::LaunchProjectile);
            }
            let (next, frame) = scene.step(state, &input);
            state = next;
            output = Some(frame);
        }
        (state, output.expect("at least one frame"))
    }

    #[test]
    fn test_orbit_angle_follows_frame_count() {
        let scene = Scene::default();
        let (state, frame) = run(&scene, scene.initial_state(), 90, None);

        let angle = scene.orbit.initial_angle + 90.0 * scene.orbit.step;
        assert!((state.orbit.orbit_angle - angle).abs() < 1e-4);
        let expected = scene.orbit.model_matrix(&OrbitState {
            orbit_angle: angle,
            spin_angle: angle,
        });
        assert!((frame.orbiter.model - expected).norm() < 1e-3);
    }

    #[test]
    fn test_first_frame_is_one_step_in() {
        let scene = Scene::default();
        assert_eq!(scene.orbit.initial_angle, 0.0);
        let (state, _) = scene.step(scene.initial_state(), &InputSnapshot::new());
        assert!((state.orbit.orbit_angle - 1f32.to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_input_shows_up_next_frame() {
        let scene = Scene::default();
        let state = scene.initial_state();
        let initial_view = state.camera.view_matrix();

        let input: InputSnapshot = [InputSignal::Rotate(Plane::YZ, Direction::Positive)]
            .into_iter()
            .collect();
        let (state, frame) = scene.step(state, &input);
        assert_eq!(frame.view, initial_view);
        assert_ne!(state.camera.view_matrix(), initial_view);

        let (_, next) = scene.step(state.clone(), &InputSnapshot::new());
        assert_eq!(next.view, state.camera.view_matrix());
    }

    #[test]
    fn test_mvp_combines_projection_view_model() {
        let scene = Scene::default();
        let (_, frame) = scene.step(scene.initial_state(), &InputSnapshot::new());
        let expected = frame.projection * frame.view * frame.orbiter.model;
        assert!((frame.orbiter.mvp - expected).norm() < 1e-6);
        assert_eq!(frame.star.model, Matrix4::identity());
    }

    #[test]
    fn test_projectile_is_drawn_only_in_flight() {
        let scene = Scene::default();
        let (state, frame) = run(&scene, scene.initial_state(), 1, Some(1));
        assert!(!frame.draw_projectile());
        assert_eq!(state.projectile.phase, ProjectilePhase::Traveling);

        let (state, frame) = run(&scene, state, 1, None);
        assert!(frame.draw_projectile());
        assert!(state.projectile.position.coords.norm() < scene.camera.position.coords.norm());
    }

    #[test]
    fn test_early_launch_misses_and_returns() {
        let scene = Scene::default();
        let (state, frame) = run(&scene, scene.initial_state(), 200, Some(1));
        assert_eq!(state.projectile.phase, ProjectilePhase::JustReturned);
        assert_eq!(state.projectile.position, state.camera.position);
        assert!(frame.draw_orbiter());
        assert!(!frame.draw_projectile());
    }

    #[test]
    fn test_collision_hides_for_the_rest_of_the_run() {
        let scene = Scene::default();
        let (state, frame) = run(&scene, scene.initial_state(), 450, Some(300));
        assert_eq!(state.projectile.phase, ProjectilePhase::Hidden);
        assert!(!frame.draw_projectile());
        assert!(!frame.draw_orbiter());

        // Relaunching and more frames change nothing
        let input: InputSnapshot = [InputSignal::LaunchProjectile].into_iter().collect();
        let (state, _) = scene.step(state, &input);
        let (state, frame) = run(&scene, state, 100, None);
        assert!(state.projectile.is_hidden());
        assert!(!state.orbiter_visible);
        assert!(!frame.draw_projectile());
    }

    #[test]
    fn test_collision_with_hand_placed_projectile() {
        let scene = Scene::default();
        let mut state = scene.initial_state();

        let mut next_orbit = state.orbit;
        next_orbit.advance(scene.orbit.step);
        state.projectile.position = scene.orbit.position(&next_orbit) + nalgebra::Vector3::new(0.0, 0.0, 6.5);

        let (state, frame) = scene.step(state, &InputSnapshot::new());
        assert!(state.projectile.is_hidden());
        assert!(!frame.draw_orbiter());
    }

    #[test]
    fn test_quit_stops_running() {
        let scene = Scene::default();
        let input: InputSnapshot = [InputSignal::Quit].into_iter().collect();
        let (state, frame) = scene.step(scene.initial_state(), &input);
        assert!(!state.running);
        assert!(frame.quit);
    }
}
