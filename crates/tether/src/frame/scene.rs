use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{OrbitCamera, Plane, Pose, WorldFrame, MAX_POSES};
use crate::director::PLAYER_POSE_INDEX;
use crate::objects::{ObjectId, ObjectRegistry};
use crate::physics::PhysicsEngine;

pub const PLAYER_NAME: &str = "player";
pub const GROUND_NAME: &str = "ground";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub player_start: Vec3,
    pub player_half_extent: f32,
    /// Cubes per side of the square grid.
    pub grid_width: usize,
    pub cube_half_extent: f32,
    pub ground_half_size: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            player_start: Vec3::new(0.0, 3.0, 0.0),
            player_half_extent: 0.5,
            grid_width: 30,
            cube_half_extent: 0.2,
            ground_half_size: 3000.0,
        }
    }
}

impl SceneConfig {
    pub fn pose_count(&self) -> usize {
        1 + self.grid_width * self.grid_width
    }
}

pub struct Scene {
    pub frame: WorldFrame,
    pub player: ObjectId,
    pub ground: ObjectId,
}

/// Builds the ground, the player cube at pose 0 and a resting grid of cubes
/// around the origin, registering each with `physics` and `registry`.
pub fn spawn_cube_grid(
    config: &SceneConfig,
    camera: OrbitCamera,
    physics: &mut dyn PhysicsEngine,
    registry: &mut ObjectRegistry,
) -> Scene {
    let pose_count = config.pose_count();
    assert!(
        pose_count <= MAX_POSES,
        "a {0}x{0} grid does not fit in one frame",
        config.grid_width
    );

    let ground = registry.register(GROUND_NAME);
    physics.add_static_plane(
        ground,
        &Plane {
            origin: Vec3::ZERO,
            half_size: config.ground_half_size,
        },
    );

    let mut frame = WorldFrame::new(pose_count, camera);
    frame.camera.target = config.player_start;

    let player = registry.register(PLAYER_NAME);
    let player_pose = Pose::at(config.player_start);
    frame.poses[PLAYER_POSE_INDEX] = player_pose;
    physics.add_dynamic_cube(
        player,
        PLAYER_POSE_INDEX as u16,
        &player_pose,
        config.player_half_extent,
        true,
    );

    let width = config.grid_width;
    let half = config.cube_half_extent;
    let spacing = 6.0 * half;
    let start = -spacing * 0.5 * Vec3::new(width as f32, 0.0, width as f32) + Vec3::new(0.0, half, 0.0);

    for i in 0..width {
        for j in 0..width {
            let index = 1 + i * width + j;
            let pose = Pose::at(start + spacing * Vec3::new(i as f32, 0.0, j as f32));
            frame.poses[index] = pose;

            let id = registry.anonymous();
            // index < pose_count <= MAX_POSES
            physics.add_dynamic_cube(id, index as u16, &pose, half, false);
        }
    }

    log::info!(
        "spawned player and {} cubes ({} poses)",
        width * width,
        pose_count
    );

    Scene {
        frame,
        player,
        ground,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RapierPhysics;

    #[test]
    fn grid_layout() {
        let config = SceneConfig {
            grid_width: 2,
            cube_half_extent: 0.5,
            ..SceneConfig::default()
        };
        let mut physics = RapierPhysics::new();
        let mut registry = ObjectRegistry::new();

        let scene = spawn_cube_grid(&config, OrbitCamera::default(), &mut physics, &mut registry);

        assert_eq!(scene.frame.pose_count(), 5);
        assert_eq!(scene.frame.poses[0].position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(scene.frame.camera.target, Vec3::new(0.0, 3.0, 0.0));
        // spacing 3, start (-3, 0.5, -3)
        assert_eq!(scene.frame.poses[1].position, Vec3::new(-3.0, 0.5, -3.0));
        assert_eq!(scene.frame.poses[2].position, Vec3::new(-3.0, 0.5, 0.0));
        assert_eq!(scene.frame.poses[3].position, Vec3::new(0.0, 0.5, -3.0));
        assert_eq!(scene.frame.poses[4].position, Vec3::new(0.0, 0.5, 0.0));
        assert!(scene.frame.active_indices.is_empty());

        assert_eq!(physics.dynamic_body_count(), 5);
        assert_eq!(physics.static_body_count(), 1);
        assert_eq!(registry.name(scene.player), "player");
        assert_eq!(registry.name(scene.ground), "ground");
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn only_player_starts_awake() {
        let config = SceneConfig {
            grid_width: 3,
            ..SceneConfig::default()
        };
        let mut physics = RapierPhysics::new();
        let mut registry = ObjectRegistry::new();
        let mut scene = spawn_cube_grid(&config, OrbitCamera::default(), &mut physics, &mut registry);

        physics.step(1.0 / 60.0, &mut scene.frame);
        assert_eq!(scene.frame.active_indices.as_slice(), &[0]);
        assert_eq!(physics.is_sleeping(scene.player), Some(false));
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn oversized_grid_panics() {
        let config = SceneConfig {
            grid_width: 256,
            ..SceneConfig::default()
        };
        spawn_cube_grid(
            &config,
            OrbitCamera::default(),
            &mut RapierPhysics::new(),
            &mut ObjectRegistry::new(),
        );
    }
}
