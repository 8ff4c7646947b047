//! Sugarfall entry point
//!
//! Thin native driver around the sim: accumulator-based fixed-timestep
//! loop, events drained to the log each frame. Rendering, audio and HUD
//! collaborators consume the same event stream; this binary just logs it.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use sugarfall::consts::*;
use sugarfall::{GameEvent, GameState, TickInput, tick};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let levels_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "levels".to_string());
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    log::info!("starting with levels from '{levels_dir}' (seed {seed})");
    let mut state = GameState::new(levels_dir, seed);
    let input = TickInput::default();

    let mut accumulator = 0.0f32;
    let mut last = Instant::now();

    while !state.should_quit {
        let now = Instant::now();
        let frame_dt = (now - last).as_secs_f32().min(0.1);
        last = now;

        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in state.drain_events() {
            report(&event);
        }

        std::thread::sleep(Duration::from_secs_f32(SIM_DT / 2.0));
    }

    log::info!("goodbye");
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::LevelStarted { level } => log::info!("level {level} start"),
        GameEvent::GrainCollected { bucket, count } => {
            log::debug!("bucket {bucket} collected a grain (total {count})");
        }
        GameEvent::BucketExploded { bucket, position } => {
            log::info!("bucket {bucket} exploded at {position}");
        }
        GameEvent::LevelComplete { level } => log::info!("level {level} complete"),
        GameEvent::GameWon => log::info!("you win!"),
        GameEvent::GravityToggled { gravity } => log::info!("gravity now {gravity}"),
        GameEvent::Paused => log::info!("paused"),
        GameEvent::Resumed => log::info!("resumed"),
    }
}
