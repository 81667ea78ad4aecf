mod rapier;

use glam::Vec3;

use crate::frame::{Plane, Pose, WorldFrame};
use crate::objects::ObjectId;

pub use rapier::RapierPhysics;

/// Rigid-body world the simulator steps once per tick.
///
/// Bodies are addressed by [`ObjectId`]. Dynamic bodies also carry the index
/// of the pose they drive in every [`WorldFrame`].
pub trait PhysicsEngine {
    /// Advances by `timestep` seconds, writing the pose of every body that is
    /// awake into `frame` and marking its index active.
    fn step(&mut self, timestep: f64, frame: &mut WorldFrame);

    fn add_static_plane(&mut self, id: ObjectId, plane: &Plane);

    fn add_dynamic_cube(
        &mut self,
        id: ObjectId,
        index: u16,
        pose: &Pose,
        half_extent: f32,
        start_active: bool,
    );

    /// Force applied during the next step only.
    fn add_force(&mut self, id: ObjectId, force: Vec3);

    fn add_impulse(&mut self, id: ObjectId, impulse: Vec3);

    fn add_torque(&mut self, id: ObjectId, axis: Vec3, torque: f32);

    /// Whether the body is resting on something below it.
    fn is_grounded(&self, id: ObjectId) -> bool;
}
