//! Teleportation zones
//!
//! Paired spatial triggers: a grain entering the entry radius is relocated
//! to the exit point with its velocity zeroed. Zones are stateless - they
//! own no grains and only inspect positions each tick. The grain's
//! mid-teleport flag prevents chained jumps: it re-arms only once the grain
//! is outside every entry radius, so a grain parked on an exit that overlaps
//! another entry cannot ping-pong forever.

use glam::Vec2;

use super::grain::Grain;
use super::world::PhysicsWorld;

/// A paired entry/exit spatial trigger.
pub struct TeleportZone {
    pub entry: Vec2,
    pub exit: Vec2,
    pub radius: f32,
}

impl TeleportZone {
    pub fn new(entry: Vec2, exit: Vec2, radius: f32) -> Self {
        Self {
            entry,
            exit,
            radius,
        }
    }

    /// Whether `pos` is within this zone's entry radius.
    pub fn covers(&self, pos: Vec2) -> bool {
        pos.distance(self.entry) <= self.radius
    }
}

/// Run the per-tick teleport check for one grain. Returns whether the grain
/// was relocated this tick.
pub fn check_teleport(world: &mut PhysicsWorld, grain: &mut Grain, zones: &[TeleportZone]) -> bool {
    let Some(pos) = grain.position(world) else {
        return false;
    };

    if grain.teleporting {
        if zones.iter().all(|zone| !zone.covers(pos)) {
            grain.teleporting = false;
        }
        return false;
    }

    for zone in zones {
        if zone.covers(pos) {
            // teleport_body wakes the body so the broad-phase drops its
            // stale cached bounds.
            world.teleport_body(grain.body(), zone.exit);
            grain.teleporting = true;
            log::debug!("grain {} teleported to {}", grain.id(), zone.exit);
            return true;
        }
    }
    false
}
