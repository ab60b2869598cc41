//! Rigid-body world facade
//!
//! Thin wrapper around rapier2d exposing only what the frame driver needs:
//! box body creation, pose/velocity access, force and impulse application,
//! and a fixed-timestep advance. Forces applied between steps act for
//! exactly one step; they are cleared after the world advances.

use glam::Vec2;
use rapier2d::prelude::*;
use std::num::NonZeroUsize;

use crate::consts::{FIXED_DT, GRAVITY_Y, SOLVER_ITERATIONS};

pub type BodyHandle = RigidBodyHandle;

pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = FIXED_DT;
        if let Some(iterations) = NonZeroUsize::new(SOLVER_ITERATIONS) {
            integration_parameters.num_solver_iterations = iterations;
        }

        Self {
            gravity: vector![0.0, GRAVITY_Y],
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Create a static box body (the ground).
    pub fn create_static_box(&mut self, pos: Vec2, half_extents: Vec2) -> BodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![pos.x, pos.y])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y).build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Create a dynamic box body.
    pub fn create_dynamic_box(
        &mut self,
        pos: Vec2,
        half_extents: Vec2,
        density: f32,
        friction: f32,
    ) -> BodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![pos.x, pos.y])
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .density(density)
            .friction(friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Advance the world by exactly one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // One-step force semantics: anything applied before this step is spent.
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
        }
    }

    pub fn position(&self, handle: BodyHandle) -> Vec2 {
        let t = self.bodies[handle].translation();
        Vec2::new(t.x, t.y)
    }

    pub fn rotation(&self, handle: BodyHandle) -> f32 {
        self.bodies[handle].rotation().angle()
    }

    pub fn linvel(&self, handle: BodyHandle) -> Vec2 {
        let v = self.bodies[handle].linvel();
        Vec2::new(v.x, v.y)
    }

    pub fn set_transform(&mut self, handle: BodyHandle, pos: Vec2, angle: f32) {
        let body = &mut self.bodies[handle];
        body.set_translation(vector![pos.x, pos.y], true);
        body.set_rotation(Rotation::new(angle), true);
    }

    pub fn set_linvel(&mut self, handle: BodyHandle, vel: Vec2) {
        self.bodies[handle].set_linvel(vector![vel.x, vel.y], true);
    }

    /// Apply a continuous force at the body's center for the next step.
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2) {
        self.bodies[handle].add_force(vector![force.x, force.y], true);
    }

    /// Apply an instantaneous impulse at the body's center.
    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse: Vec2) {
        self.bodies[handle].apply_impulse(vector![impulse.x, impulse.y], true);
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
