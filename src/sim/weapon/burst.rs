use serde::Serialize;

use super::{Attack, Loadout};
use crate::sim::combat::enemies_in_radius;
use crate::sim::enemy::push_away;
use crate::sim::state::GameState;

/// Damage everything around the character, then shove the survivors out
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Burst;

impl Attack for Burst {
    fn fire(&mut self, state: &mut GameState, loadout: &Loadout) {
        let origin = state.character.pos;
        let push = loadout.stats.knockback * state.config.tuning.combat.knockback_scale;

        let mut total = 0.0;
        for id in enemies_in_radius(&state.enemies, origin, loadout.stats.aoe_radius) {
            let Some(hit) = state.damage_enemy(id, loadout.damage, false) else {
                continue;
            };
            total += loadout.damage;
            if hit.killed {
                continue;
            }
            if let Some(enemy) = state.enemy_mut(id) {
                push_away(&mut enemy.pos, origin, push);
            }
        }
        state.apply_lifesteal(total);
    }
}
