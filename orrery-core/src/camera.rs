/// Camera rig: plane rotations and radial zoom around a fixed target
use nalgebra::{Matrix4, Point3, Vector3};
use tracing::trace;

use crate::config::CameraConfig;
use crate::transform::converge;

/// Coordinate plane a rotate signal moves the camera on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// The Y-Z plane; X is left untouched
    YZ,
    /// The X-Z plane; Y is left untouched
    XZ,
}

/// Rotation or zoom direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per rotate signal
    pub step: f32,
    pub zoom_rate: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Point3::from(config.position),
            target: Point3::origin(),
            up: Vector3::from(config.up),
            fov: config.fov_degrees.to_radians(),
            aspect: config.aspect,
            near: config.near,
            far: config.far,
            step: config.step_degrees.to_radians(),
            zoom_rate: config.zoom_rate,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Step the camera by one angular increment on `plane`, keeping its
    /// distance from the plane's axis.
    pub fn rotate(&mut self, plane: Plane, direction: Direction) {
        let (a, b) = match plane {
            Plane::YZ => (self.position.y, self.position.z),
            Plane::XZ => (self.position.x, self.position.z),
        };

        let radius = (a * a + b * b).sqrt();
        if radius == 0.0 {
            // On the rotation axis: every angle is the same point.
            trace!(?plane, "Camera on rotation axis, rotate ignored");
            return;
        }

        let angle = b.atan2(a) + direction.sign() * self.step;
        let (a, b) = (radius * angle.cos(), radius * angle.sin());
        match plane {
            Plane::YZ => {
                self.position.y = a;
                self.position.z = b;
            }
            Plane::XZ => {
                self.position.x = a;
                self.position.z = b;
            }
        }
    }

    /// Move a fixed fraction of the way toward (or away from) the target
    pub fn zoom(&mut self, direction: Direction) {
        self.position = converge(&self.position, &self.target, direction.sign() * self.zoom_rate);
    }

    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}
