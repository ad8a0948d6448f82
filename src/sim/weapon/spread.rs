use std::collections::HashSet;

use glam::Vec2;
use serde::Serialize;

use super::{Attack, Loadout};
use crate::sim::combat::closest_enemy;
use crate::sim::state::GameState;
use crate::{angle_between, polar_to_cartesian};

/// A single-hit projectile in flight
#[derive(Debug, Clone, Serialize)]
pub struct Bolt {
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub traveled: f32,
    pub max_distance: f32,
}

/// Fires a fan of bolts at the nearest enemy; bolts fly every tick until
/// they hit something or run out of range
#[derive(Debug, Clone, Default, Serialize)]
pub struct Spread {
    pub bolts: Vec<Bolt>,
}

impl Attack for Spread {
    fn fire(&mut self, state: &mut GameState, loadout: &Loadout) {
        let origin = state.character.pos;
        let seek_range = loadout.range * 2.0;
        let Some(target) = closest_enemy(&state.enemies, origin, seek_range, &HashSet::new())
            .and_then(|id| state.enemy(id))
        else {
            return;
        };
        let aim = angle_between(origin, target.pos);
        let combat = &state.config.tuning.combat;

        let count = loadout.stats.projectiles + state.character.stats.projectiles;
        let width = (count.saturating_sub(1) as f32 * combat.fan_step).min(combat.fan_max);
        let step = if count > 1 { width / (count - 1) as f32 } else { 0.0 };
        let start = aim - width / 2.0;

        for i in 0..count {
            let angle = start + step * i as f32;
            self.bolts.push(Bolt {
                pos: origin,
                vel: polar_to_cartesian(loadout.stats.projectile_speed, angle),
                damage: loadout.damage,
                traveled: 0.0,
                max_distance: loadout.range,
            });
        }
    }

    fn advance(&mut self, state: &mut GameState, _loadout: &Loadout, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        let hit_radius = state.config.tuning.combat.bolt_hit_radius;
        let mut total = 0.0;

        self.bolts.retain_mut(|bolt| {
            let step = bolt.vel * dt;
            bolt.pos += step;
            bolt.traveled += step.length();
            if bolt.traveled >= bolt.max_distance {
                return false;
            }
            let Some(id) = closest_enemy(&state.enemies, bolt.pos, hit_radius, &HashSet::new())
            else {
                return true;
            };
            if state.damage_enemy(id, bolt.damage, false).is_some() {
                total += bolt.damage;
            }
            false
        });

        if total > 0.0 {
            state.apply_lifesteal(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::weapons::FORK_BOMB;
    use crate::catalog::EnemyKind;
    use crate::sim::test_support::{place_enemy, session};
    use crate::sim::weapon::{Behavior, WeaponInstance};

    fn bolts(weapon: &WeaponInstance) -> &[Bolt] {
        match &weapon.behavior {
            Behavior::Spread(spread) => &spread.bolts,
            other => panic!("expected spread, got {other:?}"),
        }
    }

    #[test]
    fn test_fan_is_centered_on_target() {
        let mut state = session();
        let c = state.character.pos;
        place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(0.0, 350.0));
        let def = Arc::clone(state.config.catalog.weapon(&FORK_BOMB.into()).unwrap());
        let mut fork = WeaponInstance::new(def);
        // Fires at the 500ms interval; the bolts fly 150 units and miss
        fork.update(&mut state, 500.0);

        let fired = bolts(&fork);
        // 3 from the weapon plus the character's 1
        assert_eq!(fired.len(), 4);
        let angles: Vec<f32> = fired.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
        let mean = angles.iter().sum::<f32>() / angles.len() as f32;
        assert!((mean - std::f32::consts::FRAC_PI_2).abs() < 1e-4);
        assert!((angles[3] - angles[0] - 0.45).abs() < 1e-4);
    }

    #[test]
    fn test_bolt_hits_once_and_expires() {
        let mut state = session();
        let c = state.character.pos;
        let id = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(100.0, 0.0));
        let mut spread = Spread::default();
        let loadout = Loadout::new(
            crate::catalog::WeaponStats {
                damage: 6.0,
                attack_speed: 2.0,
                range: 200.0,
                ..Default::default()
            },
            &state.character.stats,
        );
        spread.bolts.push(Bolt {
            pos: c,
            vel: Vec2::new(300.0, 0.0),
            damage: 6.0,
            traveled: 0.0,
            max_distance: 200.0,
        });
        spread.bolts.push(Bolt {
            pos: c,
            vel: Vec2::new(-300.0, 0.0),
            damage: 6.0,
            traveled: 0.0,
            max_distance: 200.0,
        });

        for _ in 0..50 {
            spread.advance(&mut state, &loadout, 16.0);
        }
        assert_eq!(state.enemy(id).unwrap().current_hp, 44.0);
        assert!(spread.bolts.is_empty());
    }

    #[test]
    fn test_fan_width_is_capped() {
        let mut state = session();
        state.character.stats.projectiles = 20;
        let c = state.character.pos;
        place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(350.0, 0.0));
        let def = Arc::clone(state.config.catalog.weapon(&FORK_BOMB.into()).unwrap());
        let mut fork = WeaponInstance::new(def);
        fork.update(&mut state, 500.0);

        let fired = bolts(&fork);
        assert_eq!(fired.len(), 23);
        let angles: Vec<f32> = fired.iter().map(|b| b.vel.y.atan2(b.vel.x)).collect();
        let width = angles[22] - angles[0];
        assert!((width - std::f32::consts::FRAC_PI_3).abs() < 1e-4);
        assert!((angles[11]).abs() < 1e-4);
    }
}
