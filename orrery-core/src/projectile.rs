/// Homing projectile: launch, converge on the star, return or collide
use nalgebra::{Matrix4, Point3};
use tracing::debug;

use crate::config::ProjectileConfig;
use crate::transform::{converge, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectilePhase {
    /// Waiting at the initial spawn point
    Idle,
    /// Homing in on the star
    Traveling,
    /// Came back from the star; docked at the camera until relaunched
    JustReturned,
    /// Collided with the orbiting body. Never left.
    Hidden,
}

/// Thresholds and rates shared by every projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingRules {
    pub rate: f32,
    pub return_radius: f32,
    pub collision_radius: f32,
    pub scale: f32,
}

impl HomingRules {
    pub fn from_config(config: &ProjectileConfig) -> Self {
        Self {
            rate: config.homing_rate,
            return_radius: config.return_radius,
            collision_radius: config.collision_radius,
            scale: config.scale,
        }
    }
}

impl Default for HomingRules {
    fn default() -> Self {
        Self::from_config(&ProjectileConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Point3<f32>,
    pub spawn: Point3<f32>,
    pub phase: ProjectilePhase,
}

impl Projectile {
    pub fn new(spawn: Point3<f32>) -> Self {
        Self {
            position: spawn,
            spawn,
            phase: ProjectilePhase::Idle,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.phase == ProjectilePhase::Hidden
    }

    /// Only an in-flight projectile is drawn
    pub fn is_drawn(&self) -> bool {
        self.phase == ProjectilePhase::Traveling
    }

    /// Start homing. Returns false when the projectile cannot launch (already
    /// traveling or hidden).
    pub fn launch(&mut self) -> bool {
        match self.phase {
            ProjectilePhase::Idle | ProjectilePhase::JustReturned => {
                debug!(position = ?self.position, "Projectile launched");
                self.phase = ProjectilePhase::Traveling;
                true
            }
            ProjectilePhase::Traveling | ProjectilePhase::Hidden => false,
        }
    }

    /// Advance one frame.
    ///
    /// A returned projectile follows `dock`. A traveling one closes a fixed
    /// fraction of its distance to `star`; once inside the return radius it
    /// jumps back to `dock`.
    pub fn update(&mut self, rules: &HomingRules, star: &Point3<f32>, dock: &Point3<f32>) {
        match self.phase {
            ProjectilePhase::JustReturned => {
                self.spawn = *dock;
                self.position = *dock;
            }
            ProjectilePhase::Traveling => {
                self.position = converge(&self.position, star, rules.rate);

                let distance = (self.position - star).norm();
                if distance <= rules.return_radius {
                    debug!(distance, "Projectile reached the star, returning");
                    self.spawn = *dock;
                    self.position = *dock;
                    self.phase = ProjectilePhase::JustReturned;
                }
            }
            ProjectilePhase::Idle | ProjectilePhase::Hidden => {}
        }
    }

    /// Hide the projectile for good if it is within the collision radius of
    /// `body`. Returns true on the frame the collision happens.
    pub fn check_collision(&mut self, rules: &HomingRules, body: &Point3<f32>) -> bool {
        if self.is_hidden() {
            return false;
        }

        let distance = (self.position - body).norm();
        if distance > rules.collision_radius {
            return false;
        }

        debug!(distance, previous = ?self.phase, "Projectile collided with orbiting body");
        self.phase = ProjectilePhase::Hidden;
        true
    }

    pub fn model_matrix(&self, rules: &HomingRules) -> Matrix4<f32> {
        Transform::translation(&self.position.coords) * Transform::scale(rules.scale)
    }
}
