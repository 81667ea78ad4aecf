use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Spherical offset. Yaw 0 points along +X, yaw 90° along -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radial {
    pub pitch: f32,
    pub yaw: f32,
    pub distance: f32,
}

impl Radial {
    pub fn direction(&self) -> Vec3 {
        let flat = self.yaw.sin() * Vec3::NEG_Z + self.yaw.cos() * Vec3::X;
        self.pitch.sin() * Vec3::Y + self.pitch.cos() * flat
    }

    pub fn offset(&self) -> Vec3 {
        self.direction() * self.distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Perspective {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub position_rel: Radial,
    pub params: Perspective,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::with_aspect(1280.0 / 720.0)
    }
}

impl OrbitCamera {
    pub fn with_aspect(aspect: f32) -> Self {
        Self::new(
            Radial {
                pitch: 35f32.to_radians(),
                yaw: 45f32.to_radians(),
                distance: 10.0,
            },
            Perspective {
                fov: 60f32.to_radians(),
                near: 0.05,
                far: 300.0,
                aspect,
            },
        )
    }

    pub fn new(position_rel: Radial, params: Perspective) -> Self {
        Self {
            target: Vec3::ZERO,
            position_rel,
            params,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.target + self.position_rel.offset()
    }

    pub fn view_direction(&self) -> Vec3 {
        -self.position_rel.direction()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.params.fov,
            self.params.aspect,
            self.params.near,
            self.params.far,
        )
    }
}
