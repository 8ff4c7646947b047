//! Simulation module
//!
//! All gameplay logic lives here, under a fixed timestep:
//! - No rendering, audio, or platform dependencies
//! - Semantic commands in (`TickInput`), notifications out (`GameEvent`)
//! - Every entity is exclusively owned by the current level and torn down
//!   deterministically on reload

pub mod bucket;
pub mod grain;
pub mod level;
pub mod moving_bucket;
pub mod obstacle;
pub mod state;
pub mod teleport;
pub mod tick;
pub mod world;

pub use bucket::Bucket;
pub use grain::Grain;
pub use level::{LevelData, LevelLoadError};
pub use moving_bucket::MovingBucket;
pub use obstacle::StaticObstacle;
pub use state::{GameEvent, GamePhase, GameState};
pub use teleport::TeleportZone;
pub use tick::{TickInput, tick};
pub use world::PhysicsWorld;
