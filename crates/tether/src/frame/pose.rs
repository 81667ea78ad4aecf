use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Linear position, spherical rotation.
    pub fn lerp(a: &Pose, b: &Pose, alpha: f32) -> Pose {
        Pose {
            position: a.position.lerp(b.position, alpha),
            rotation: a.rotation.slerp(b.rotation, alpha),
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Static square ground. Its top face sits at `origin.y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    pub half_size: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            half_size: 1.0,
        }
    }
}
