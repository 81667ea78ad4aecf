use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::frame::WorldFrame;
use crate::input::Input;
use crate::objects::ObjectId;
use crate::physics::PhysicsEngine;

/// Game rules hooked around each physics step.
pub trait GameDirector {
    fn pre_physics(
        &mut self,
        timestep: f64,
        input: &Input,
        frame: &mut WorldFrame,
        physics: &mut dyn PhysicsEngine,
    );

    fn post_physics(
        &mut self,
        timestep: f64,
        input: &Input,
        frame: &mut WorldFrame,
        physics: &mut dyn PhysicsEngine,
    );
}

pub const PLAYER_POSE_INDEX: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub roll_torque: f32,
    pub move_force: f32,
    pub jump_impulse: f32,
    pub max_jumps: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            roll_torque: 5000.0,
            move_force: 1250.0,
            jump_impulse: 5000.0,
            max_jumps: 3,
        }
    }
}

/// Rolls the player cube toward the input direction and lets it jump a
/// limited number of times before landing again. The camera follows it.
#[derive(Debug, Clone)]
pub struct PlayerDirector {
    player: ObjectId,
    tuning: PlayerTuning,
    jumps_used: u32,
    jump_held: bool,
    grounded: bool,
}

impl PlayerDirector {
    pub fn new(player: ObjectId, tuning: PlayerTuning) -> Self {
        Self {
            player,
            tuning,
            jumps_used: 0,
            jump_held: false,
            grounded: false,
        }
    }

    pub fn jumps_used(&self) -> u32 {
        self.jumps_used
    }
}

impl GameDirector for PlayerDirector {
    fn pre_physics(
        &mut self,
        _timestep: f64,
        input: &Input,
        _frame: &mut WorldFrame,
        physics: &mut dyn PhysicsEngine,
    ) {
        let grounded = physics.is_grounded(self.player);
        if grounded && !self.grounded {
            self.jumps_used = 0;
        }
        self.grounded = grounded;

        let direction = input.direction;
        if direction.length_squared() > 0.1 {
            physics.add_torque(self.player, Vec3::Y.cross(direction), self.tuning.roll_torque);
            physics.add_force(self.player, direction * self.tuning.move_force);
        }

        // One jump per press, not per tick the button is held.
        let pressed = input.jump() && !self.jump_held;
        self.jump_held = input.jump();
        if pressed && self.jumps_used < self.tuning.max_jumps {
            physics.add_impulse(self.player, Vec3::new(0.0, self.tuning.jump_impulse, 0.0));
            self.jumps_used += 1;
            log::debug!("jump {}/{}", self.jumps_used, self.tuning.max_jumps);
        }
    }

    fn post_physics(
        &mut self,
        _timestep: f64,
        _input: &Input,
        frame: &mut WorldFrame,
        _physics: &mut dyn PhysicsEngine,
    ) {
        frame.camera.target = frame.poses[PLAYER_POSE_INDEX].position;
    }
}
