//! Sugarfall - a falling-grain physics puzzle game
//!
//! Core modules:
//! - `sim`: Simulation layer (physics world, grains, buckets, teleports,
//!   level lifecycle, per-tick driver)
//!
//! The sim is platform-free: it consumes semantic commands, mutates its own
//! state under a fixed timestep, and reports back through a drained event
//! queue. Rendering, audio and raw device input live outside the core.

pub mod sim;

pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Hard cap on the timestep handed to the physics solver. Frame-time
    /// jitter must never destabilize the solver.
    pub const MAX_TIME_STEP: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Physics solver iteration count (collision accuracy)
    pub const SOLVER_ITERATIONS: usize = 30;

    /// Arena dimensions (world units, y-up)
    pub const ARENA_WIDTH: f32 = 1024.0;
    pub const ARENA_HEIGHT: f32 = 800.0;
    /// Default gravity (points down; the toggle negates it)
    pub const GRAVITY_Y: f32 = -900.0;

    /// Grain defaults
    pub const GRAIN_SIZE: f32 = 2.0;
    pub const GRAIN_MASS: f32 = 1.0;
    pub const GRAIN_FRICTION: f32 = 0.1;
    pub const GRAIN_RESTITUTION: f32 = 0.5;
    /// Horizontal jitter applied at the spout so grains don't stack in a
    /// perfect column
    pub const SPAWN_JITTER: f32 = 2.0;

    /// Bucket wall material
    pub const BUCKET_WALL_FRICTION: f32 = 0.5;
    pub const BUCKET_WALL_RESTITUTION: f32 = 0.5;
    /// Horizontal step per move command for the player-controlled bucket
    pub const BUCKET_MOVE_STEP: f32 = 10.0;

    /// Explosion tuning: grains within this radius of the bucket center get
    /// an outward impulse of `EXPLOSION_IMPULSE / (distance + 1)`
    pub const EXPLOSION_RADIUS: f32 = 60.0;
    pub const EXPLOSION_IMPULSE: f32 = 600.0;

    /// Default entry radius for teleportation zones missing one in level data
    pub const TELEPORT_DEFAULT_RADIUS: f32 = 15.0;

    /// Heavy per-pair gameplay checks run every Nth tick, not every step
    pub const RULE_CHECK_INTERVAL: u64 = 20;

    /// Deadline delays, in ticks at `SIM_DT`
    pub const INTRO_DELAY_TICKS: u64 = 2 * 120;
    pub const FLOW_START_DELAY_TICKS: u64 = 5 * 120;
    pub const LEVEL_LOAD_DELAY_TICKS: u64 = 2 * 120;
    pub const QUIT_DELAY_TICKS: u64 = 5 * 120;

    /// Static obstacle defaults
    pub const OBSTACLE_THICKNESS: f32 = 2.0;
    pub const OBSTACLE_FRICTION: f32 = 0.5;
    pub const OBSTACLE_RESTITUTION: f32 = 0.5;
}
