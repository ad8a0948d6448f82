//! Headless driver: plays one seeded run with a simple autopilot and prints
//! the run summary as JSON.
//!
//! Usage: `stack-survivors [SEED] [CONFIG_JSON]`

use std::collections::HashSet;
use std::error::Error;

use glam::Vec2;
use stack_survivors::consts::{DEFAULT_SEED, SIM_DT_MS};
use stack_survivors::sim::{
    GameEvent, GameState, RunSummary, TickInput, closest_enemy, start_run, tick,
};
use stack_survivors::GameConfig;

/// Stop after this much simulated time even if the autopilot survives
const MAX_RUN_MS: f64 = 15.0 * 60_000.0;

fn main() {
    env_logger::init();
    match run() {
        Ok(summary) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("failed to encode summary: {err}"),
        },
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<RunSummary, Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => DEFAULT_SEED,
    };
    let config = match args.next() {
        Some(path) => GameConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    let mut state = start_run(config.shared(), seed)?;
    while !state.is_ended() {
        if state.elapsed_ms >= MAX_RUN_MS {
            state.end_run();
            break;
        }
        let input = TickInput {
            direction: autopilot(&state),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT_MS);

        if let Some(offer) = &state.offer {
            let pick = offer.entries[0].id.clone();
            state.choose_upgrade(&pick)?;
        }
        for event in state.drain_events() {
            log_event(&event);
        }
    }
    Ok(state.summary())
}

/// Back away from the nearest enemy, drift toward the arena center otherwise
fn autopilot(state: &GameState) -> Vec2 {
    let pos = state.character.pos;
    let threat = closest_enemy(&state.enemies, pos, 200.0, &HashSet::new())
        .and_then(|id| state.enemy(id));
    match threat {
        Some(enemy) => (pos - enemy.pos).normalize_or_zero(),
        None => {
            let world = &state.config.tuning.world;
            let center = Vec2::new(world.width / 2.0, world.height / 2.0);
            let offset = center - pos;
            if offset.length() > 50.0 {
                offset.normalize()
            } else {
                Vec2::ZERO
            }
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LeveledUp { level } => log::debug!("level {level}"),
        GameEvent::WeaponAcquired { weapon } => log::debug!("picked up {weapon}"),
        GameEvent::CharacterDamaged { amount, hp } => log::trace!("took {amount}, hp {hp}"),
        _ => {}
    }
}
