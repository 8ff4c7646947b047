//! Static line obstacles
//!
//! Immovable segment colliders: arena walls, level geometry, and
//! player-drawn lines. Immutable after creation; deleted in bulk when the
//! level is torn down.

use glam::Vec2;
use rapier2d::prelude::ColliderHandle;

use super::world::PhysicsWorld;

/// An immovable line-segment collider.
pub struct StaticObstacle {
    a: Vec2,
    b: Vec2,
    /// Display color name, carried for the render collaborator.
    pub color: String,
    /// Display thickness, carried for the render collaborator.
    pub thickness: f32,
    collider: ColliderHandle,
    removed: bool,
}

impl StaticObstacle {
    pub fn new(
        world: &mut PhysicsWorld,
        a: Vec2,
        b: Vec2,
        color: &str,
        thickness: f32,
        friction: f32,
        restitution: f32,
    ) -> Self {
        let collider = world.insert_static_segment(a, b, friction, restitution);
        Self {
            a,
            b,
            color: color.to_string(),
            thickness,
            collider,
            removed: false,
        }
    }

    pub fn endpoints(&self) -> (Vec2, Vec2) {
        (self.a, self.b)
    }

    /// Remove the obstacle's collider from the world. Idempotent.
    pub fn delete(&mut self, world: &mut PhysicsWorld) {
        if self.removed {
            return;
        }
        world.remove_collider(self.collider);
        self.removed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_obstacle_lifecycle() {
        let mut world = PhysicsWorld::new();
        let mut line = StaticObstacle::new(
            &mut world,
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            "green",
            OBSTACLE_THICKNESS,
            OBSTACLE_FRICTION,
            OBSTACLE_RESTITUTION,
        );
        assert_eq!(world.collider_count(), 1);
        assert_eq!(line.endpoints(), (Vec2::ZERO, Vec2::new(100.0, 0.0)));

        line.delete(&mut world);
        assert_eq!(world.collider_count(), 0);
        line.delete(&mut world);
        assert_eq!(world.collider_count(), 0);
    }

    #[test]
    fn test_grain_lands_on_floor_segment() {
        use super::super::grain::Grain;

        let mut world = PhysicsWorld::new();
        let _floor = StaticObstacle::new(
            &mut world,
            Vec2::new(-200.0, 0.0),
            Vec2::new(200.0, 0.0),
            "green",
            OBSTACLE_THICKNESS,
            OBSTACLE_FRICTION,
            OBSTACLE_RESTITUTION,
        );
        let grain = Grain::spawn(&mut world, 1, Vec2::new(0.0, 50.0), GRAIN_FRICTION);

        for _ in 0..600 {
            world.step(SIM_DT);
        }

        let pos = grain.position(&world).unwrap();
        assert!(pos.y > -5.0, "grain fell through the floor: y={}", pos.y);
        assert!(pos.y < 10.0, "grain never fell: y={}", pos.y);
    }
}
