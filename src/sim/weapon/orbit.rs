use std::collections::HashMap;
use std::f32::consts::TAU;

use serde::Serialize;

use super::{Attack, Loadout};
use crate::catalog::WeaponStats;
use crate::sim::combat::enemies_in_radius;
use crate::sim::state::GameState;
use crate::{polar_to_cartesian, wrap_angle};

#[derive(Debug, Clone, Default, Serialize)]
pub struct Orbital {
    pub angle: f32,
    /// Enemy id -> ms until this orbital may hit it again
    pub cooldowns: HashMap<u32, f32>,
}

/// Orbitals circling the character, damaging whatever they touch. Each
/// orbital keeps its own per-enemy hit cooldown.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Orbit {
    pub orbitals: Vec<Orbital>,
}

impl Orbit {
    pub fn new(count: u32) -> Self {
        let mut orbit = Self::default();
        orbit.rebuild(count);
        orbit
    }

    /// Evenly spaced orbitals with fresh cooldowns
    fn rebuild(&mut self, count: u32) {
        let step = TAU / count.max(1) as f32;
        self.orbitals = (0..count)
            .map(|i| Orbital {
                angle: wrap_angle(i as f32 * step),
                cooldowns: HashMap::new(),
            })
            .collect();
    }
}

impl Attack for Orbit {
    fn fire(&mut self, _state: &mut GameState, _loadout: &Loadout) {}

    fn advance(&mut self, state: &mut GameState, loadout: &Loadout, dt_ms: f32) {
        let combat = state.config.tuning.combat.clone();
        let center = state.character.pos;

        let mut total = 0.0;
        for orbital in &mut self.orbitals {
            orbital.angle = wrap_angle(orbital.angle + combat.orbit_angular_speed * dt_ms / 1000.0);
            orbital.cooldowns.retain(|_, left| {
                *left -= dt_ms;
                *left > 0.0
            });

            let pos = center + polar_to_cartesian(loadout.stats.orbit_radius, orbital.angle);
            for id in enemies_in_radius(&state.enemies, pos, combat.orbit_contact_radius) {
                if orbital.cooldowns.contains_key(&id) {
                    continue;
                }
                if state.damage_enemy(id, loadout.damage, false).is_some() {
                    total += loadout.damage;
                    orbital.cooldowns.insert(id, combat.orbit_hit_cooldown_ms);
                }
            }
        }
        if total > 0.0 {
            state.apply_lifesteal(total);
        }
    }

    fn level_changed(&mut self, stats: &WeaponStats) {
        self.rebuild(stats.orbit_count);
    }
}
