/// Orrery Core Library - mesh loading and per-frame scene kinematics
///
/// This library turns OBJ text into flat triangle buffers and steps a small
/// orbital scene (star, orbiting body, homing projectile, camera rig) one frame
/// at a time. Rendering is left to the caller: each frame yields the matrices
/// and visibility flags a renderer needs.

pub mod camera;
pub mod config;
pub mod geometry;
pub mod input;
pub mod obj;
pub mod orbit;
pub mod projectile;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, Direction, Plane};
pub use config::{is_valid_aspect, ConfigError, SceneConfig};
pub use geometry::{IndexedMesh, Mesh, Vertex};
pub use input::{InputSignal, InputSnapshot};
pub use obj::{load_obj, parse_obj, ObjData, ObjError};
pub use orbit::{Orbit, OrbitState};
pub use projectile::{HomingRules, Projectile, ProjectilePhase};
pub use scene::{BodyFrame, FrameOutput, Scene, SceneState};
pub use transform::Transform;
