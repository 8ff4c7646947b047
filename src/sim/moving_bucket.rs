//! Player-controlled bucket
//!
//! A bucket riding a kinematic body constrained to horizontal motion: move
//! commands translate the body in place, so all three walls move atomically
//! and there is never a frame without colliders. The fill state lives in the
//! wrapped `Bucket` and survives every move. Kinematic bodies ignore
//! gravity, so the bucket holds its height regardless of the gravity toggle.

use glam::Vec2;

use super::bucket::Bucket;
use super::world::PhysicsWorld;

/// A bucket whose horizontal position is player-controlled.
pub struct MovingBucket {
    pub bucket: Bucket,
}

impl MovingBucket {
    pub fn new(
        world: &mut PhysicsWorld,
        id: u32,
        center: Vec2,
        width: f32,
        height: f32,
        needed: u32,
    ) -> Self {
        let body = world.insert_kinematic_body(center);
        Self {
            bucket: Bucket::with_body(world, id, body, width, height, needed),
        }
    }

    /// Shift the bucket horizontally. Disabled once exploded.
    pub fn move_by(&mut self, world: &mut PhysicsWorld, dx: f32) {
        if self.bucket.exploded() {
            return;
        }
        if let Some(center) = self.bucket.center(world) {
            world.set_body_position(self.bucket.body(), Vec2::new(center.x + dx, center.y));
        }
    }
}
