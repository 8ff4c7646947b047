//! Physics world wrapper
//!
//! Owns the rigid-body simulation space: gravity vector, solver iteration
//! count, and the rapier pipeline state. Everything else in the sim talks to
//! physics through this struct, and all nalgebra conversion stays inside
//! this file - the rest of the crate works in `glam::Vec2`.

use std::num::NonZeroUsize;

use glam::Vec2;
use rapier2d::prelude::*;

use crate::consts::*;

#[inline]
fn to_na(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn from_na(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// The rigid-body simulation space.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        let mut params = IntegrationParameters::default();
        if let Some(iters) = NonZeroUsize::new(SOLVER_ITERATIONS) {
            params.num_solver_iterations = iters;
        }
        Self {
            gravity: vector![0.0, GRAVITY_Y],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Advance all bodies by `dt`, applying gravity and resolving contacts.
    /// The timestep handed to the solver is capped at `MAX_TIME_STEP`.
    pub fn step(&mut self, dt: f32) {
        self.params.dt = dt.min(MAX_TIME_STEP);
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Change global gravity. Takes effect on the next step. Sleeping
    /// bodies are woken, otherwise settled grains would ignore the flip
    /// until something else disturbed them.
    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_na(gravity);
        for (_, body) in self.bodies.iter_mut() {
            body.wake_up(true);
        }
    }

    pub fn gravity(&self) -> Vec2 {
        from_na(&self.gravity)
    }

    /// Insert a small dynamic box body (used for grains). CCD is enabled so
    /// fast grains cannot tunnel through thin segment colliders.
    pub fn insert_dynamic_box(
        &mut self,
        pos: Vec2,
        half_extent: f32,
        mass: f32,
        friction: f32,
        restitution: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_na(pos))
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(half_extent, half_extent)
            .mass(mass)
            .friction(friction)
            .restitution(restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Insert a fixed body with no colliders; walls get attached separately.
    pub fn insert_fixed_body(&mut self, pos: Vec2) -> RigidBodyHandle {
        self.bodies
            .insert(RigidBodyBuilder::fixed().translation(to_na(pos)).build())
    }

    /// Insert a kinematic body (player-controlled bucket). Ignores gravity;
    /// repositioned explicitly.
    pub fn insert_kinematic_body(&mut self, pos: Vec2) -> RigidBodyHandle {
        self.bodies.insert(
            RigidBodyBuilder::kinematic_position_based()
                .translation(to_na(pos))
                .build(),
        )
    }

    /// Attach a segment collider to a body, endpoints in body-local space.
    pub fn attach_segment(
        &mut self,
        body: RigidBodyHandle,
        a: Vec2,
        b: Vec2,
        friction: f32,
        restitution: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y])
            .friction(friction)
            .restitution(restitution)
            .build();
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies)
    }

    /// Insert a free-standing static segment collider in world space
    /// (arena walls, level geometry, player-drawn lines).
    pub fn insert_static_segment(
        &mut self,
        a: Vec2,
        b: Vec2,
        friction: f32,
        restitution: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::segment(point![a.x, a.y], point![b.x, b.y])
            .friction(friction)
            .restitution(restitution)
            .build();
        self.colliders.insert(collider)
    }

    /// Remove a body and its colliders. Safe to call with a stale handle.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let _ = self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Remove a single collider. Safe to call with a stale handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        let _ = self
            .colliders
            .remove(handle, &mut self.islands, &mut self.bodies, true);
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| from_na(b.translation()))
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies.get(handle).map(|b| from_na(b.linvel()))
    }

    /// Move a body to a new position, waking it so the broad-phase refreshes
    /// its cached bounds on the next step.
    pub fn set_body_position(&mut self, handle: RigidBodyHandle, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_na(pos), true);
        }
    }

    /// Relocate a body and zero its velocity (teleportation).
    pub fn teleport_body(&mut self, handle: RigidBodyHandle, pos: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(to_na(pos), true);
            body.set_linvel(vector![0.0, 0.0], true);
        }
    }

    /// Apply a one-shot impulse at the body's center of mass.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec2) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.apply_impulse(to_na(impulse), true);
        }
    }

    /// Number of bodies currently in the world.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of colliders currently in the world.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
