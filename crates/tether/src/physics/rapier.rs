use std::collections::HashMap;

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::PhysicsEngine;
use crate::frame::{Plane, Pose as FramePose, WorldFrame};
use crate::objects::ObjectId;

const GROUND_PROBE_MARGIN: Real = 0.05;
// kg/m³, as dense as water
const CUBE_DENSITY: Real = 1000.0;
const PLANE_HALF_THICKNESS: Real = 1.0;

#[derive(Debug, Clone, Copy)]
struct DynamicBody {
    handle: RigidBodyHandle,
    index: u16,
    half_extent: Real,
}

pub struct RapierPhysics {
    pipeline: PhysicsPipeline,
    integration_parameters: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    gravity: Vector,
    // Insertion order, so active indices come out deterministic.
    dynamic: Vec<DynamicBody>,
    by_id: HashMap<ObjectId, usize>,
    statics: HashMap<ObjectId, ColliderHandle>,
}

impl Default for RapierPhysics {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierPhysics {
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(gravity.x, gravity.y, gravity.z),
            dynamic: Vec::new(),
            by_id: HashMap::new(),
            statics: HashMap::new(),
        }
    }

    pub fn dynamic_body_count(&self) -> usize {
        self.dynamic.len()
    }

    pub fn static_body_count(&self) -> usize {
        self.statics.len()
    }

    /// Current pose of a dynamic body, awake or not.
    pub fn pose(&self, id: ObjectId) -> Option<FramePose> {
        let body = self.dynamic_body(id)?;
        self.bodies.get(body.handle).map(read_pose)
    }

    pub fn is_sleeping(&self, id: ObjectId) -> Option<bool> {
        let body = self.dynamic_body(id)?;
        self.bodies.get(body.handle).map(RigidBody::is_sleeping)
    }

    fn dynamic_body(&self, id: ObjectId) -> Option<DynamicBody> {
        self.by_id.get(&id).map(|&slot| self.dynamic[slot])
    }

    fn body_mut(&mut self, id: ObjectId) -> Option<&mut RigidBody> {
        let Some(body) = self.dynamic_body(id) else {
            log::warn!("no dynamic body for object {id}");
            return None;
        };
        self.bodies.get_mut(body.handle)
    }

    fn assert_unmapped(&self, id: ObjectId) {
        assert!(
            !self.by_id.contains_key(&id) && !self.statics.contains_key(&id),
            "object {id} already has a physics body"
        );
    }
}

fn read_pose(body: &RigidBody) -> FramePose {
    let t = body.translation();
    let r = body.rotation();
    FramePose::new(
        Vec3::new(t.x, t.y, t.z),
        Quat::from_xyzw(r.x, r.y, r.z, r.w),
    )
}

impl PhysicsEngine for RapierPhysics {
    fn step(&mut self, timestep: f64, frame: &mut WorldFrame) {
        let dt = timestep as Real;
        self.integration_parameters.dt = dt;
        self.integration_parameters.min_ccd_dt = dt / 100.0;

        self.pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &(),
        );

        for entry in &self.dynamic {
            let Some(body) = self.bodies.get_mut(entry.handle) else {
                continue;
            };
            body.reset_forces(false);
            body.reset_torques(false);
            if body.is_sleeping() {
                continue;
            }
            frame.poses[usize::from(entry.index)] = read_pose(body);
            frame.mark_active(entry.index);
        }
    }

    fn add_static_plane(&mut self, id: ObjectId, plane: &Plane) {
        self.assert_unmapped(id);
        let origin = plane.origin;
        let collider = ColliderBuilder::cuboid(plane.half_size, PLANE_HALF_THICKNESS, plane.half_size)
            .translation(Vector::new(origin.x, origin.y - PLANE_HALF_THICKNESS, origin.z))
            .friction(0.5)
            .build();
        let handle = self.colliders.insert(collider);
        self.statics.insert(id, handle);
        log::debug!("static plane {id} at {origin}");
    }

    fn add_dynamic_cube(
        &mut self,
        id: ObjectId,
        index: u16,
        pose: &FramePose,
        half_extent: f32,
        start_active: bool,
    ) {
        self.assert_unmapped(id);

        let position = Vector::new(pose.position.x, pose.position.y, pose.position.z);
        let body = RigidBodyBuilder::dynamic()
            .translation(position)
            .ccd_enabled(true)
            .sleeping(!start_active)
            .build();
        let handle = self.bodies.insert(body);

        if pose.rotation != Quat::IDENTITY {
            let q = pose.rotation;
            let rotation = Rotation::from_xyzw(q.x, q.y, q.z, q.w).normalize();
            if let Some(body) = self.bodies.get_mut(handle) {
                body.set_position(Pose::from_parts(position, rotation), start_active);
            }
        }

        let collider = ColliderBuilder::cuboid(half_extent, half_extent, half_extent)
            .density(CUBE_DENSITY)
            .friction(0.5)
            .restitution(0.1)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        self.by_id.insert(id, self.dynamic.len());
        self.dynamic.push(DynamicBody {
            handle,
            index,
            half_extent,
        });
    }

    fn add_force(&mut self, id: ObjectId, force: Vec3) {
        if let Some(body) = self.body_mut(id) {
            body.add_force(Vector::new(force.x, force.y, force.z), true);
        }
    }

    fn add_impulse(&mut self, id: ObjectId, impulse: Vec3) {
        if let Some(body) = self.body_mut(id) {
            body.apply_impulse(Vector::new(impulse.x, impulse.y, impulse.z), true);
        }
    }

    fn add_torque(&mut self, id: ObjectId, axis: Vec3, torque: f32) {
        let torque = axis * torque;
        if let Some(body) = self.body_mut(id) {
            body.add_torque(Vector::new(torque.x, torque.y, torque.z), true);
        }
    }

    fn is_grounded(&self, id: ObjectId) -> bool {
        let Some(entry) = self.dynamic_body(id) else {
            return false;
        };
        let Some(body) = self.bodies.get(entry.handle) else {
            return false;
        };

        let query = self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            QueryFilter::default().exclude_rigid_body(entry.handle),
        );

        let pos = body.translation();
        let ray = Ray::new(
            Vector::new(pos.x, pos.y, pos.z),
            Vector::new(0.0, -1.0, 0.0),
        );
        query
            .cast_ray(&ray, entry.half_extent + GROUND_PROBE_MARGIN, true)
            .is_some()
    }
}
