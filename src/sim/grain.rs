//! Sugar grain entity
//!
//! A grain is a small dynamic box body falling through the world. Grains are
//! owned exclusively by the current level: spawned by the driver's drop
//! cadence, deleted on level teardown or when explicitly removed.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use super::world::PhysicsWorld;
use crate::consts::*;

/// A single falling grain.
pub struct Grain {
    id: u32,
    body: RigidBodyHandle,
    /// Set while the grain is mid-teleport; cleared once it is outside every
    /// entry radius again (see `teleport::check_teleport`).
    pub teleporting: bool,
    /// Latched by `delete` so a second call cannot touch the world again.
    removed: bool,
}

impl Grain {
    /// Create a grain as a small dynamic body at `pos`.
    pub fn spawn(world: &mut PhysicsWorld, id: u32, pos: Vec2, friction: f32) -> Self {
        let body = world.insert_dynamic_box(
            pos,
            GRAIN_SIZE / 2.0,
            GRAIN_MASS,
            friction,
            GRAIN_RESTITUTION,
        );
        Self {
            id,
            body,
            teleporting: false,
            removed: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    /// Current position, `None` once the grain has been removed.
    pub fn position(&self, world: &PhysicsWorld) -> Option<Vec2> {
        if self.removed {
            return None;
        }
        world.body_position(self.body)
    }

    pub fn velocity(&self, world: &PhysicsWorld) -> Option<Vec2> {
        if self.removed {
            return None;
        }
        world.body_velocity(self.body)
    }

    /// Remove the grain's body from the world. Calling this twice is a
    /// no-op, not an error.
    pub fn delete(&mut self, world: &mut PhysicsWorld) {
        if self.removed {
            return;
        }
        world.remove_body(self.body);
        self.removed = true;
    }
}
