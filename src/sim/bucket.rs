//! Bucket entity and its fill/explosion state machine
//!
//! A bucket is a three-walled collector (left, right, bottom - the top is
//! open) attached to a single body, so walls always reflect the body's
//! position exactly. Grains enter by falling and cannot leave except via
//! explosion, which makes the collected set append-only and `count` a
//! reliable win-condition signal.
//!
//! States: collecting -> exploded (terminal). Once `exploded` latches, the
//! bucket never rebuilds walls, never collects, never resets its count.

use std::collections::HashSet;

use glam::Vec2;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

use super::grain::Grain;
use super::world::PhysicsWorld;
use crate::consts::*;

/// An open-top grain collector with a capacity and explosion behavior.
pub struct Bucket {
    id: u32,
    body: RigidBodyHandle,
    /// Left, right, bottom wall colliders; `None` after explosion.
    walls: Option<[ColliderHandle; 3]>,
    half_width: f32,
    half_height: f32,
    needed: u32,
    count: u32,
    collected: HashSet<u32>,
    exploded: bool,
}

impl Bucket {
    /// Create a bucket on a fixed body at `center`.
    pub fn new(
        world: &mut PhysicsWorld,
        id: u32,
        center: Vec2,
        width: f32,
        height: f32,
        needed: u32,
    ) -> Self {
        let body = world.insert_fixed_body(center);
        Self::with_body(world, id, body, width, height, needed)
    }

    /// Attach walls to an existing body (the moving bucket supplies a
    /// kinematic one).
    pub(super) fn with_body(
        world: &mut PhysicsWorld,
        id: u32,
        body: RigidBodyHandle,
        width: f32,
        height: f32,
        needed: u32,
    ) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        let left = world.attach_segment(
            body,
            Vec2::new(-hw, -hh),
            Vec2::new(-hw, hh),
            BUCKET_WALL_FRICTION,
            BUCKET_WALL_RESTITUTION,
        );
        let right = world.attach_segment(
            body,
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            BUCKET_WALL_FRICTION,
            BUCKET_WALL_RESTITUTION,
        );
        let bottom = world.attach_segment(
            body,
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            BUCKET_WALL_FRICTION,
            BUCKET_WALL_RESTITUTION,
        );
        Self {
            id,
            body,
            walls: Some([left, right, bottom]),
            half_width: hw,
            half_height: hh,
            needed,
            count: 0,
            collected: HashSet::new(),
            exploded: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn needed(&self) -> u32 {
        self.needed
    }

    pub fn exploded(&self) -> bool {
        self.exploded
    }

    pub(super) fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn center(&self, world: &PhysicsWorld) -> Option<Vec2> {
        world.body_position(self.body)
    }

    /// Whether `pos` lies within the open-top bounding box.
    pub fn contains(&self, world: &PhysicsWorld, pos: Vec2) -> bool {
        let Some(center) = self.center(world) else {
            return false;
        };
        pos.x >= center.x - self.half_width
            && pos.x <= center.x + self.half_width
            && pos.y >= center.y - self.half_height
            && pos.y <= center.y + self.half_height
    }

    /// Try to collect a grain. Records it at most once; reaching capacity
    /// triggers the explosion against `nearby` grains. Returns whether the
    /// grain was newly collected. No-op once exploded.
    pub fn collect(&mut self, world: &mut PhysicsWorld, grain: &Grain, nearby: &[Grain]) -> bool {
        if self.exploded {
            return false;
        }
        let Some(pos) = grain.position(world) else {
            return false;
        };
        if !self.contains(world, pos) {
            return false;
        }
        if !self.collected.insert(grain.id()) {
            return false;
        }
        self.count += 1;
        if self.count >= self.needed {
            self.explode(world, nearby);
        }
        true
    }

    /// Blast nearby grains outward and remove the walls. Idempotent: a
    /// second call is a no-op.
    pub fn explode(&mut self, world: &mut PhysicsWorld, grains: &[Grain]) {
        if self.exploded {
            return;
        }
        let Some(center) = self.center(world) else {
            return;
        };

        for grain in grains {
            let Some(pos) = grain.position(world) else {
                continue;
            };
            let delta = pos - center;
            let dist = delta.length();
            if dist >= EXPLOSION_RADIUS {
                continue;
            }
            // The +1 in the denominator bounds the impulse for grains
            // sitting on the center.
            let dir = if dist > f32::EPSILON {
                delta / dist
            } else {
                Vec2::Y
            };
            let magnitude = EXPLOSION_IMPULSE / (dist + 1.0);
            world.apply_impulse(grain.body(), dir * magnitude);
        }

        if let Some(walls) = self.walls.take() {
            for wall in walls {
                world.remove_collider(wall);
            }
        }
        self.exploded = true;
    }

    /// Zero the fill counter. Only valid while collecting; exploded buckets
    /// keep their final count forever.
    pub fn reset_count(&mut self) {
        if self.exploded {
            return;
        }
        self.count = 0;
        self.collected.clear();
    }

    /// Tear the bucket down entirely (level reload). Removes the body and
    /// any remaining walls. Idempotent via stale-handle-safe removal.
    pub fn delete(&mut self, world: &mut PhysicsWorld) {
        self.walls = None;
        world.remove_body(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn world_with_bucket(needed: u32) -> (PhysicsWorld, Bucket) {
        let mut world = PhysicsWorld::new();
        // Box spans [0,10] x [0,5].
        let bucket = Bucket::new(&mut world, 0, Vec2::new(5.0, 2.5), 10.0, 5.0, needed);
        (world, bucket)
    }

    #[test]
    fn test_collect_inside_box() {
        let (mut world, mut bucket) = world_with_bucket(10);
        let grain = Grain::spawn(&mut world, 1, Vec2::new(5.0, 2.0), GRAIN_FRICTION);
        let grains = [grain];

        assert!(bucket.collect(&mut world, &grains[0], &grains));
        assert_eq!(bucket.count(), 1);
    }

    #[test]
    fn test_collect_same_grain_twice_counts_once() {
        let (mut world, mut bucket) = world_with_bucket(10);
        let grain = Grain::spawn(&mut world, 1, Vec2::new(5.0, 2.0), GRAIN_FRICTION);
        let grains = [grain];

        assert!(bucket.collect(&mut world, &grains[0], &grains));
        assert!(!bucket.collect(&mut world, &grains[0], &grains));
        assert_eq!(bucket.count(), 1);
    }

    #[test]
    fn test_collect_outside_box_is_rejected() {
        let (mut world, mut bucket) = world_with_bucket(10);
        let grain = Grain::spawn(&mut world, 1, Vec2::new(50.0, 50.0), GRAIN_FRICTION);
        let grains = [grain];

        assert!(!bucket.collect(&mut world, &grains[0], &grains));
        assert_eq!(bucket.count(), 0);
    }

    #[test]
    fn test_capacity_triggers_explosion_and_latches() {
        let (mut world, mut bucket) = world_with_bucket(3);
        let grains: Vec<Grain> = (0..4)
            .map(|i| {
                Grain::spawn(
                    &mut world,
                    i,
                    Vec2::new(2.0 + i as f32, 2.0),
                    GRAIN_FRICTION,
                )
            })
            .collect();

        for grain in grains.iter().take(3) {
            bucket.collect(&mut world, grain, &grains);
        }
        assert_eq!(bucket.count(), 3);
        assert!(bucket.exploded());

        // A fourth grain entering afterward changes nothing.
        assert!(!bucket.collect(&mut world, &grains[3], &grains));
        assert_eq!(bucket.count(), 3);
    }

    #[test]
    fn test_explosion_removes_walls_once() {
        let (mut world, mut bucket) = world_with_bucket(3);
        let baseline = world.collider_count();
        let grains: Vec<Grain> = Vec::new();

        bucket.explode(&mut world, &grains);
        assert!(bucket.exploded());
        assert_eq!(world.collider_count(), baseline - 3);

        // Idempotent guard: re-exploding must not touch the world again.
        bucket.explode(&mut world, &grains);
        assert_eq!(world.collider_count(), baseline - 3);
    }

    #[test]
    fn test_explosion_blasts_nearby_grains_outward() {
        let (mut world, mut bucket) = world_with_bucket(3);
        let grains = [
            Grain::spawn(&mut world, 1, Vec2::new(8.0, 2.5), GRAIN_FRICTION),
            // Far outside the blast radius.
            Grain::spawn(&mut world, 2, Vec2::new(500.0, 500.0), GRAIN_FRICTION),
        ];

        bucket.explode(&mut world, &grains);

        let vel = grains[0].velocity(&world).unwrap();
        assert!(vel.x > 0.0, "grain right of center should fly right: {vel}");
        assert_eq!(grains[1].velocity(&world).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_reset_count_only_while_collecting() {
        let (mut world, mut bucket) = world_with_bucket(3);
        let grain = Grain::spawn(&mut world, 1, Vec2::new(5.0, 2.0), GRAIN_FRICTION);
        let grains = [grain];

        bucket.collect(&mut world, &grains[0], &grains);
        bucket.reset_count();
        assert_eq!(bucket.count(), 0);

        bucket.explode(&mut world, &grains);
        // Terminal state: the count is frozen.
        bucket.reset_count();
        assert!(bucket.exploded());
    }

    proptest! {
        /// With capacity out of reach, count equals the number of distinct
        /// grains inside the box, and re-running collection never changes it.
        #[test]
        fn prop_count_matches_distinct_inside_grains(
            positions in prop::collection::vec((0.0f32..20.0, 0.0f32..10.0), 1..8)
        ) {
            let (mut world, mut bucket) = world_with_bucket(u32::MAX);
            let grains: Vec<Grain> = positions
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| {
                    Grain::spawn(&mut world, i as u32, Vec2::new(x, y), GRAIN_FRICTION)
                })
                .collect();

            let inside = positions
                .iter()
                .filter(|(x, y)| *x >= 0.0 && *x <= 10.0 && *y >= 0.0 && *y <= 5.0)
                .count() as u32;

            for grain in &grains {
                bucket.collect(&mut world, grain, &grains);
            }
            prop_assert_eq!(bucket.count(), inside);

            for grain in &grains {
                bucket.collect(&mut world, grain, &grains);
            }
            prop_assert_eq!(bucket.count(), inside);
        }
    }
}
