/// Scene constants, loadable from a RON file
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene config")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid scene config: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Everything that shapes the scene. Defaults reproduce the classic demo.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub projectile: ProjectileConfig,
    pub meshes: MeshPaths,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub up: [f32; 3],
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Angle added or removed per rotate signal
    pub step_degrees: f32,
    pub zoom_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [50.0, 50.0, 0.0],
            up: [0.0, 0.0, 1.0],
            fov_degrees: 45.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
            step_degrees: 1.0,
            zoom_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbitConfig {
    /// Offset of the body from the star before revolution
    pub offset: [f32; 3],
    pub orbit_axis: [f32; 3],
    pub spin_axis: [f32; 3],
    /// Angle added to both the orbit and the spin every frame
    pub step_degrees: f32,
    pub initial_degrees: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            offset: [20.0, -10.0, 0.0],
            orbit_axis: [0.0, 0.0, 1.0],
            spin_axis: [0.0, 1.0, 0.0],
            step_degrees: 1.0,
            initial_degrees: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileConfig {
    /// Fraction of the remaining distance covered each frame
    pub homing_rate: f32,
    /// Distance to the star at which the projectile returns to its spawn point
    pub return_radius: f32,
    /// Distance to the orbiting body that counts as a collision
    pub collision_radius: f32,
    pub scale: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            homing_rate: 0.01,
            return_radius: 17.0,
            collision_radius: 7.0,
            scale: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MeshPaths {
    pub star: PathBuf,
    pub orbiter: PathBuf,
    pub projectile: PathBuf,
}

impl Default for MeshPaths {
    fn default() -> Self {
        Self {
            star: PathBuf::from("assets/sun.obj"),
            orbiter: PathBuf::from("assets/planet.obj"),
            projectile: PathBuf::from("assets/planet.obj"),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a RON scene description
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading scene config");

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Check every scalar the per-frame step relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        check("camera.position", finite(&camera.position), "must be finite")?;
        check("camera.position", !is_zero(&camera.position), "must differ from the star")?;
        check("camera.up", finite(&camera.up) && !is_zero(&camera.up), "must be a non-zero vector")?;
        check("camera.aspect", is_valid_aspect(camera.aspect), "must be finite and positive")?;
        check(
            "camera.fov_degrees",
            camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            "must lie in (0, 180)",
        )?;
        check("camera.near", camera.near > 0.0, "must be positive")?;
        check(
            "camera.far",
            camera.far.is_finite() && camera.far > camera.near,
            "must be finite and beyond near",
        )?;
        check("camera.step_degrees", camera.step_degrees.is_finite(), "must be finite")?;
        check("camera.zoom_rate", unit_rate(camera.zoom_rate), "must lie in (0, 1)")?;

        let orbit = &self.orbit;
        check("orbit.offset", finite(&orbit.offset), "must be finite")?;
        check(
            "orbit.orbit_axis",
            finite(&orbit.orbit_axis) && !is_zero(&orbit.orbit_axis),
            "must be a non-zero vector",
        )?;
        check(
            "orbit.spin_axis",
            finite(&orbit.spin_axis) && !is_zero(&orbit.spin_axis),
            "must be a non-zero vector",
        )?;
        check("orbit.step_degrees", orbit.step_degrees.is_finite(), "must be finite")?;
        check("orbit.initial_degrees", orbit.initial_degrees.is_finite(), "must be finite")?;

        let projectile = &self.projectile;
        check("projectile.homing_rate", unit_rate(projectile.homing_rate), "must lie in (0, 1)")?;
        check(
            "projectile.return_radius",
            non_negative(projectile.return_radius),
            "must be finite and not negative",
        )?;
        check(
            "projectile.collision_radius",
            non_negative(projectile.collision_radius),
            "must be finite and not negative",
        )?;
        check(
            "projectile.scale",
            projectile.scale.is_finite() && projectile.scale > 0.0,
            "must be finite and positive",
        )?;
        Ok(())
    }

    /// Mesh paths resolved against `base`, leaving absolute paths untouched
    pub fn mesh_paths_relative_to(&self, base: &Path) -> MeshPaths {
        MeshPaths {
            star: base.join(&self.meshes.star),
            orbiter: base.join(&self.meshes.orbiter),
            projectile: base.join(&self.meshes.projectile),
        }
    }
}

/// Aspect ratios the perspective projection accepts
pub fn is_valid_aspect(aspect: f32) -> bool {
    aspect.is_finite() && aspect > 0.0
}

fn check(field: &'static str, ok: bool, reason: &'static str) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason })
    }
}

fn finite(v: &[f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn is_zero(v: &[f32; 3]) -> bool {
    v.iter().all(|&c| c == 0.0)
}

fn unit_rate(rate: f32) -> bool {
    rate > 0.0 && rate < 1.0
}

fn non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
