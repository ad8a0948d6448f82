use std::collections::HashSet;

use serde::Serialize;

use super::{Attack, Loadout};
use crate::sim::combat::closest_enemy;
use crate::sim::state::GameState;

/// Lightning that starts at the nearest enemy and hops to the nearest unhit
/// enemy, losing damage geometrically with every hop
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Chain;

impl Attack for Chain {
    fn fire(&mut self, state: &mut GameState, loadout: &Loadout) {
        let origin = state.character.pos;
        let hop_radius = state.config.tuning.combat.chain_radius;
        let Some(first) = closest_enemy(&state.enemies, origin, loadout.range, &HashSet::new())
        else {
            return;
        };

        let hops = loadout.stats.chain_count + state.character.stats.chain_count;
        let mut hit = HashSet::from([first]);
        let mut targets = vec![first];
        let mut from = state.enemy(first).map_or(origin, |e| e.pos);
        for _ in 0..hops {
            let Some(next) = closest_enemy(&state.enemies, from, hop_radius, &hit) else {
                break;
            };
            hit.insert(next);
            targets.push(next);
            if let Some(e) = state.enemy(next) {
                from = e.pos;
            }
        }

        let mut total = 0.0;
        let mut damage = loadout.damage;
        for id in targets {
            if state.damage_enemy(id, damage, false).is_some() {
                total += damage;
            }
            damage *= loadout.stats.chain_falloff;
        }
        state.apply_lifesteal(total);
    }
}
