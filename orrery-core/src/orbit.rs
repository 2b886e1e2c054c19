/// Orbiting-while-spinning motion of a body around the star
use std::f32::consts::TAU;

use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::OrbitConfig;
use crate::transform::Transform;

/// Accumulated orbit and spin angles in radians, kept in `[0, 2π)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub orbit_angle: f32,
    pub spin_angle: f32,
}

impl OrbitState {
    pub fn new(initial_angle: f32) -> Self {
        let angle = initial_angle.rem_euclid(TAU);
        Self {
            orbit_angle: angle,
            spin_angle: angle,
        }
    }

    /// Add one frame's step to both angles
    pub fn advance(&mut self, step: f32) {
        self.orbit_angle = (self.orbit_angle + step).rem_euclid(TAU);
        self.spin_angle = (self.spin_angle + step).rem_euclid(TAU);
    }
}

/// Fixed geometry of an orbit
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub offset: Vector3<f32>,
    pub orbit_axis: Vector3<f32>,
    pub spin_axis: Vector3<f32>,
    /// Radians added to both angles every frame
    pub step: f32,
    pub initial_angle: f32,
}

impl Orbit {
    pub fn from_config(config: &OrbitConfig) -> Self {
        Self {
            offset: Vector3::from(config.offset),
            orbit_axis: Vector3::from(config.orbit_axis),
            spin_axis: Vector3::from(config.spin_axis),
            step: config.step_degrees.to_radians(),
            initial_angle: config.initial_degrees.to_radians(),
        }
    }

    pub fn initial_state(&self) -> OrbitState {
        OrbitState::new(self.initial_angle)
    }

    pub fn radius(&self) -> f32 {
        self.offset.norm()
    }

    /// `Rotate(orbit) * Translate(offset) * Rotate(spin)`: spin in place, move
    /// out to the offset, then revolve the result about the origin.
    pub fn model_matrix(&self, state: &OrbitState) -> Matrix4<f32> {
        Transform::rotation(state.orbit_angle, &self.orbit_axis)
            * Transform::translation(&self.offset)
            * Transform::rotation(state.spin_angle, &self.spin_axis)
    }

    /// World position of the body's centre
    pub fn position(&self, state: &OrbitState) -> Point3<f32> {
        Transform::origin_of(&self.model_matrix(state))
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::from_config(&OrbitConfig::default())
    }
}
