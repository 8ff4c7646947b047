//! Fixed timestep simulation tick
//!
//! Per-frame orchestration: semantic commands in, physics step, then the
//! gameplay rules pass. Heavy per-pair checks (collection, explosion
//! finalization, spawning) run every `RULE_CHECK_INTERVAL`th tick - their
//! correctness only needs sub-second latency, not per-step exactness.
//! Teleport checks are cheap and run every tick.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};
use super::teleport;
use crate::consts::*;

/// Semantic commands for a single tick. Raw device input never crosses
/// this boundary.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move the player-controlled bucket left
    pub move_left: bool,
    /// Move the player-controlled bucket right
    pub move_right: bool,
    /// Invert gravity
    pub toggle_gravity: bool,
    /// Pause/resume toggle
    pub pause: bool,
    /// Reload the current level
    pub restart: bool,
    /// A line segment the player just finished drawing
    pub draw_line: Option<(Vec2, Vec2)>,
}

/// Advance the game state by one fixed timestep.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                state.push_event(GameEvent::Paused);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                state.push_event(GameEvent::Resumed);
            }
            _ => {}
        }
    }
    // Paused freezes tick time entirely; deadlines hold their fire.
    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    if state.phase == GamePhase::Playing {
        if input.restart {
            state.schedule_level_load(state.current_level, LEVEL_LOAD_DELAY_TICKS);
        }
        if input.toggle_gravity {
            let gravity = -state.world.gravity();
            state.world.set_gravity(gravity);
            state.push_event(GameEvent::GravityToggled { gravity });
        }
        if input.move_left {
            if let Some(moving) = &mut state.moving_bucket {
                moving.move_by(&mut state.world, -BUCKET_MOVE_STEP);
            }
        }
        if input.move_right {
            if let Some(moving) = &mut state.moving_bucket {
                moving.move_by(&mut state.world, BUCKET_MOVE_STEP);
            }
        }
        if let Some((a, b)) = input.draw_line {
            let line = super::obstacle::StaticObstacle::new(
                &mut state.world,
                a,
                b,
                "blue",
                OBSTACLE_THICKNESS,
                OBSTACLE_FRICTION,
                OBSTACLE_RESTITUTION,
            );
            state.drawn_lines.push(line);
        }
    }

    check_deadlines(state);

    if state.phase != GamePhase::Playing {
        return;
    }

    // The world clamps the solver timestep internally.
    state.world.step(dt);

    // Teleports run every tick so a grain cannot sail through an entry
    // radius between rule passes.
    for grain in &mut state.grains {
        teleport::check_teleport(&mut state.world, grain, &state.zones);
    }

    if state.time_ticks % RULE_CHECK_INTERVAL == 0 {
        run_rules(state);
    }
}

/// Fire any deadlines that have come due.
fn check_deadlines(state: &mut GameState) {
    if let Some(at) = state.flow_start_at {
        if state.time_ticks >= at {
            state.flow_start_at = None;
            state.dropping = true;
            log::info!("grain flow started for level {}", state.current_level);
        }
    }

    if let Some((at, level)) = state.load_level_at {
        if state.time_ticks >= at {
            state.load_level_at = None;
            match state.load_level(level) {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    // Running out of levels is the win condition.
                    state.teardown();
                    state.phase = GamePhase::GameOver;
                    state.push_event(GameEvent::GameWon);
                    state.quit_at = Some(state.time_ticks + QUIT_DELAY_TICKS);
                    log::info!("no level {level} - game won");
                }
                Err(e) => {
                    log::error!("failed to load level {level}: {e}");
                }
            }
        }
    }

    if let Some(at) = state.quit_at {
        if state.time_ticks >= at {
            state.quit_at = None;
            state.should_quit = true;
        }
    }
}

/// The throttled gameplay rules pass, in the fixed order: finalize last
/// pass's explosions, evaluate the win condition, then collect, then spawn.
/// A grain is never counted into a bucket already slated for removal.
fn run_rules(state: &mut GameState) {
    let mut events: Vec<GameEvent> = Vec::new();

    // Completion is evaluated against the full container set before any
    // removal; an exploded bucket still counts as its terminal state.
    let all_exploded = state.container_total > 0
        && state.buckets.iter().all(|b| b.exploded())
        && state
            .moving_bucket
            .as_ref()
            .is_none_or(|m| m.bucket.exploded());

    for i in (0..state.buckets.len()).rev() {
        if state.buckets[i].exploded() {
            let mut bucket = state.buckets.remove(i);
            bucket.delete(&mut state.world);
        }
    }

    if all_exploded && !state.level_complete {
        state.level_complete = true;
        events.push(GameEvent::LevelComplete {
            level: state.current_level,
        });
        state.schedule_level_load(state.current_level + 1, LEVEL_LOAD_DELAY_TICKS);
        log::info!("level {} complete", state.current_level);
    }

    // Collection for the buckets that survived removal.
    for bucket in &mut state.buckets {
        for grain in &state.grains {
            let was_exploded = bucket.exploded();
            if bucket.collect(&mut state.world, grain, &state.grains) {
                events.push(GameEvent::GrainCollected {
                    bucket: bucket.id(),
                    count: bucket.count(),
                });
                if !was_exploded && bucket.exploded() {
                    if let Some(position) = bucket.center(&state.world) {
                        events.push(GameEvent::BucketExploded {
                            bucket: bucket.id(),
                            position,
                        });
                    }
                }
            }
        }
    }

    if let Some(moving) = &mut state.moving_bucket {
        for grain in &state.grains {
            let was_exploded = moving.bucket.exploded();
            if moving.bucket.collect(&mut state.world, grain, &state.grains) {
                events.push(GameEvent::GrainCollected {
                    bucket: moving.bucket.id(),
                    count: moving.bucket.count(),
                });
                if !was_exploded && moving.bucket.exploded() {
                    if let Some(position) = moving.bucket.center(&state.world) {
                        events.push(GameEvent::BucketExploded {
                            bucket: moving.bucket.id(),
                            position,
                        });
                    }
                }
            }
        }
    }

    // Spawn cadence: one grain per eligible tick until the target is
    // reached, then the spout closes for good.
    if state.dropping && state.grains_spawned < state.grain_target {
        state.spawn_grain();
        if state.grains_spawned >= state.grain_target {
            state.dropping = false;
        }
    }

    for event in events {
        state.push_event(event);
    }
}
