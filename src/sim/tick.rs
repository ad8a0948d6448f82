//! Fixed-order simulation tick
//!
//! One call advances a run by `dt_ms`: timers, spawning, movement, contact
//! damage, weapons, pickups and leveling, boss, death. A lethal contact hit
//! ends the run before weapons fire. Nothing runs while the run is paused,
//! waiting on an upgrade choice, or over.

use std::sync::Arc;

use glam::Vec2;

use super::event::{EndReason, GameEvent};
use super::state::{GameState, RunPhase};
use crate::catalog::GameConfig;
use crate::error::ConfigError;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement direction, magnitude ≤ 1 (longer vectors are clamped)
    pub direction: Vec2,
    /// Pause toggle
    pub pause: bool,
}

/// Start a new run from a validated config
pub fn start_run(config: Arc<GameConfig>, seed: u64) -> Result<GameState, ConfigError> {
    GameState::new(config, seed)
}

/// Advance the run by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != RunPhase::Playing || !(dt_ms > 0.0) || !dt_ms.is_finite() {
        return;
    }

    let config = Arc::clone(&state.config);
    let tuning = &config.tuning;
    state.elapsed_ms += dt_ms as f64;

    let healed = state.character.update_timers(dt_ms, &tuning.player);
    if healed > 0.0 {
        state.events.push(GameEvent::CharacterHealed {
            amount: healed,
            hp: state.character.current_hp,
        });
    }

    state.run_spawner(dt_ms);

    state
        .character
        .move_toward(input.direction, dt_ms, &tuning.world);
    let target = state.character.pos;
    for enemy in &mut state.enemies {
        enemy.seek(target, dt_ms);
    }

    apply_contact_damage(state);
    if state.character.is_dead() {
        state.finish(EndReason::Died);
        return;
    }
    fire_weapons(state, dt_ms);
    state.update_pickups(dt_ms);
    state.check_boss_spawn();

    if state.character.is_dead() {
        state.finish(EndReason::Died);
    }
}

/// The first enemy touching the character hits it; the invincibility window
/// absorbs the rest
fn apply_contact_damage(state: &mut GameState) {
    if state.character.is_invincible() {
        return;
    }
    let c = &state.character;
    let Some(damage) = state
        .enemies
        .iter()
        .find(|e| e.pos.distance(c.pos) < e.radius + c.radius)
        .map(|e| e.damage)
    else {
        return;
    };

    if let Some(lost) = state
        .character
        .take_damage(damage, &state.config.tuning.player)
    {
        state.events.push(GameEvent::CharacterDamaged {
            amount: lost,
            hp: state.character.current_hp,
        });
    }
}

/// Weapons are moved out of the character while they run so they can take
/// the whole state mutably
fn fire_weapons(state: &mut GameState, dt_ms: f32) {
    let mut weapons = std::mem::take(&mut state.character.weapons);
    for weapon in &mut weapons {
        weapon.update(state, dt_ms);
    }
    state.character.weapons = weapons;
}
