mod camera;
mod pose;
mod scene;
mod world;

pub use camera::{OrbitCamera, Perspective, Radial};
pub use pose::{Plane, Pose};
pub use scene::{spawn_cube_grid, Scene, SceneConfig, GROUND_NAME, PLAYER_NAME};
pub use world::{WorldFrame, MAX_POSES};
