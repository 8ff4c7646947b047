//! Game state and events
//!
//! `GameState` owns the physics world and every entity of the current
//! level. All mutation happens on the driver's turn - there is no
//! concurrency. Collaborators (renderer, audio, HUD) observe the sim by
//! draining the event queue after each frame; the sim never depends on
//! them.

use std::path::PathBuf;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bucket::Bucket;
use super::grain::Grain;
use super::level::{LevelData, LevelLoadError};
use super::moving_bucket::MovingBucket;
use super::obstacle::StaticObstacle;
use super::teleport::TeleportZone;
use super::world::PhysicsWorld;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the first level to load
    Intro,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended (the player beat the last level)
    GameOver,
}

/// Notifications pushed to rendering/audio/HUD collaborators. The core
/// never waits on their completion.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    GrainCollected { bucket: u32, count: u32 },
    BucketExploded { bucket: u32, position: Vec2 },
    LevelComplete { level: u32 },
    GameWon,
    GravityToggled { gravity: Vec2 },
    Paused,
    Resumed,
}

/// Complete simulation state for one run.
pub struct GameState {
    pub world: PhysicsWorld,
    pub phase: GamePhase,
    pub current_level: u32,
    pub level_complete: bool,

    pub grains: Vec<Grain>,
    pub buckets: Vec<Bucket>,
    pub moving_bucket: Option<MovingBucket>,
    pub statics: Vec<StaticObstacle>,
    /// Player-drawn lines, torn down with the level like statics.
    pub drawn_lines: Vec<StaticObstacle>,
    pub zones: Vec<TeleportZone>,

    pub spout: Vec2,
    pub grain_target: u32,
    /// Total grains ever spawned this level. Deleting grains never reopens
    /// the spout: the target compares against this, not against liveness.
    pub grains_spawned: u32,
    pub dropping: bool,

    pub time_ticks: u64,
    /// How many containers the level started with; completion is only
    /// meaningful when this is nonzero.
    pub(super) container_total: usize,

    // One-shot deadlines as absolute tick values; `None` = disarmed. A
    // level reload cancels them deterministically.
    pub(super) flow_start_at: Option<u64>,
    pub(super) load_level_at: Option<(u64, u32)>,
    pub(super) quit_at: Option<u64>,
    /// Set once the quit deadline fires; the embedding loop observes it.
    pub should_quit: bool,

    levels_dir: PathBuf,
    events: Vec<GameEvent>,
    pub(super) rng: Pcg32,
    next_grain_id: u32,
}

impl GameState {
    /// Create a new run. The first level loads after the intro delay.
    pub fn new(levels_dir: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            world: PhysicsWorld::new(),
            phase: GamePhase::Intro,
            current_level: 0,
            level_complete: false,
            grains: Vec::new(),
            buckets: Vec::new(),
            moving_bucket: None,
            statics: Vec::new(),
            drawn_lines: Vec::new(),
            zones: Vec::new(),
            spout: Vec2::ZERO,
            grain_target: 0,
            grains_spawned: 0,
            dropping: false,
            time_ticks: 0,
            container_total: 0,
            flow_start_at: None,
            load_level_at: Some((INTRO_DELAY_TICKS, 1)),
            quit_at: None,
            should_quit: false,
            levels_dir: levels_dir.into(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_grain_id: 1,
        }
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn level_path(&self, level: u32) -> PathBuf {
        self.levels_dir.join(format!("level{level}.json"))
    }

    /// Load level `level` from the levels directory and make it current.
    pub fn load_level(&mut self, level: u32) -> Result<(), LevelLoadError> {
        let data = LevelData::load(&self.level_path(level))?;
        self.apply_level(level, &data);
        Ok(())
    }

    /// Tear down the current level and build `data` in its place.
    pub fn apply_level(&mut self, level: u32, data: &LevelData) {
        self.teardown();

        // Gravity resets to the default for every level.
        self.world.set_gravity(Vec2::new(0.0, GRAVITY_Y));

        self.build_arena_walls();
        for s in &data.statics {
            self.statics.push(StaticObstacle::new(
                &mut self.world,
                Vec2::new(s.x1, s.y1),
                Vec2::new(s.x2, s.y2),
                &s.color,
                s.line_width,
                s.friction,
                s.restitution,
            ));
        }

        for (i, b) in data.buckets.iter().enumerate() {
            self.buckets.push(Bucket::new(
                &mut self.world,
                i as u32,
                Vec2::new(b.x, b.y),
                b.width,
                b.height,
                b.needed_sugar,
            ));
        }
        self.moving_bucket = data.moving_bucket.as_ref().map(|b| {
            MovingBucket::new(
                &mut self.world,
                data.buckets.len() as u32,
                Vec2::new(b.x, b.y),
                b.width,
                b.height,
                b.needed_sugar,
            )
        });
        self.container_total = self.buckets.len() + self.moving_bucket.is_some() as usize;

        self.zones = data
            .teleportations
            .iter()
            .map(|tp| {
                TeleportZone::new(
                    Vec2::new(tp.entry[0], tp.entry[1]),
                    Vec2::new(tp.exit[0], tp.exit[1]),
                    tp.entry_radius,
                )
            })
            .collect();

        self.spout = data.spout();
        self.grain_target = data.number_sugar_grains;
        self.grains_spawned = 0;
        self.dropping = false;
        self.flow_start_at = Some(self.time_ticks + FLOW_START_DELAY_TICKS);

        self.current_level = level;
        self.level_complete = false;
        self.phase = GamePhase::Playing;
        self.push_event(GameEvent::LevelStarted { level });
        log::info!(
            "level {} loaded: {} containers, {} grains to drop, {} teleport zones",
            level,
            self.container_total,
            self.grain_target,
            self.zones.len()
        );
    }

    /// Floor, side walls and ceiling, so grains cannot leave the arena.
    fn build_arena_walls(&mut self) {
        let corners = [
            (Vec2::new(0.0, 0.0), Vec2::new(ARENA_WIDTH, 0.0)),
            (Vec2::new(0.0, 0.0), Vec2::new(0.0, ARENA_HEIGHT)),
            (
                Vec2::new(ARENA_WIDTH, 0.0),
                Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            ),
            (
                Vec2::new(0.0, ARENA_HEIGHT),
                Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            ),
        ];
        for (a, b) in corners {
            self.statics.push(StaticObstacle::new(
                &mut self.world,
                a,
                b,
                "green",
                OBSTACLE_THICKNESS,
                OBSTACLE_FRICTION,
                OBSTACLE_RESTITUTION,
            ));
        }
    }

    /// Delete every owned entity and cancel pending per-level deadlines.
    /// Runs before the next level's entities are built so nothing ever
    /// references a stale body.
    pub(super) fn teardown(&mut self) {
        for grain in &mut self.grains {
            grain.delete(&mut self.world);
        }
        self.grains.clear();
        for line in &mut self.drawn_lines {
            line.delete(&mut self.world);
        }
        self.drawn_lines.clear();
        for obstacle in &mut self.statics {
            obstacle.delete(&mut self.world);
        }
        self.statics.clear();
        for bucket in &mut self.buckets {
            bucket.delete(&mut self.world);
        }
        self.buckets.clear();
        if let Some(mut moving) = self.moving_bucket.take() {
            moving.bucket.delete(&mut self.world);
        }
        self.zones.clear();

        self.flow_start_at = None;
        self.dropping = false;
        self.grains_spawned = 0;
        self.container_total = 0;
    }

    /// Drop one grain at the spout (with a little horizontal jitter).
    pub(super) fn spawn_grain(&mut self) {
        let jitter = self.rng.random_range(-SPAWN_JITTER..=SPAWN_JITTER);
        let pos = Vec2::new(self.spout.x + jitter, self.spout.y);
        let id = self.next_grain_id;
        self.next_grain_id += 1;
        self.grains
            .push(Grain::spawn(&mut self.world, id, pos, GRAIN_FRICTION));
        self.grains_spawned += 1;
    }

    /// Arm the level-load deadline (level advance or restart).
    pub(super) fn schedule_level_load(&mut self, level: u32, delay_ticks: u64) {
        self.load_level_at = Some((self.time_ticks + delay_ticks, level));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::LevelData;

    fn test_level() -> LevelData {
        LevelData::from_json(
            r#"{
                "spout_x": 500.0, "spout_y": 780.0, "number_sugar_grains": 5,
                "buckets": [
                    {"x": 200.0, "y": 50.0, "width": 60.0, "height": 50.0, "needed_sugar": 2}
                ],
                "statics": [],
                "teleportations": [{"entry": [296.0, 0.0], "exit": [900.0, 700.0]}],
                "moving_bucket":
                    {"x": 335.0, "y": 122.0, "width": 50.0, "height": 46.0, "needed_sugar": 3}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_apply_level_builds_entities() {
        let mut state = GameState::new("levels", 1);
        state.apply_level(1, &test_level());

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.buckets.len(), 1);
        assert!(state.moving_bucket.is_some());
        assert_eq!(state.container_total, 2);
        assert_eq!(state.zones.len(), 1);
        // Arena walls are statics too.
        assert_eq!(state.statics.len(), 4);
        assert_eq!(state.grain_target, 5);
        assert!(!state.dropping);
        assert!(state.flow_start_at.is_some());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelStarted { level: 1 }]
        );
    }

    #[test]
    fn test_teardown_leaves_empty_world() {
        let mut state = GameState::new("levels", 1);
        state.apply_level(1, &test_level());
        for _ in 0..3 {
            state.spawn_grain();
        }
        assert!(state.world.body_count() > 0);

        state.teardown();
        assert_eq!(state.world.body_count(), 0);
        assert_eq!(state.world.collider_count(), 0);
        assert!(state.grains.is_empty());
        assert!(state.buckets.is_empty());
        assert!(state.moving_bucket.is_none());
        assert!(state.zones.is_empty());
    }

    #[test]
    fn test_reload_cancels_flow_deadline() {
        let mut state = GameState::new("levels", 1);
        state.apply_level(1, &test_level());
        let first_deadline = state.flow_start_at;

        state.time_ticks += 100;
        state.apply_level(1, &test_level());

        // The reload re-armed the deadline relative to the new load time.
        assert_ne!(state.flow_start_at, first_deadline);
        assert_eq!(
            state.flow_start_at,
            Some(state.time_ticks + FLOW_START_DELAY_TICKS)
        );
    }

    #[test]
    fn test_spawn_counts_total_spawned() {
        let mut state = GameState::new("levels", 1);
        state.apply_level(1, &test_level());

        state.spawn_grain();
        state.spawn_grain();
        assert_eq!(state.grains_spawned, 2);

        // Deleting a grain does not decrement the spawn ledger.
        let mut grain = state.grains.pop().unwrap();
        grain.delete(&mut state.world);
        assert_eq!(state.grains_spawned, 2);
    }
}
