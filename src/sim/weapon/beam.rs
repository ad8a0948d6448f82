use std::cmp::Ordering;
use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use super::{Attack, Loadout};
use crate::sim::combat::{closest_enemy, enemies_in_radius};
use crate::sim::state::GameState;
use crate::{angle_between, wrap_angle};

/// Hit-scan at the nearest enemy. Pierce, chaining and splash come from the
/// character's stats; every target after the first takes reduced damage.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Beam;

impl Attack for Beam {
    fn fire(&mut self, state: &mut GameState, loadout: &Loadout) {
        let origin = state.character.pos;
        let Some(first) = closest_enemy(&state.enemies, origin, loadout.range, &HashSet::new())
        else {
            return;
        };
        let combat = state.config.tuning.combat.clone();
        let stats = state.character.stats;

        let crit = state.rng.random::<f32>() < stats.crit_chance;
        let damage = if crit {
            loadout.damage * combat.crit_multiplier
        } else {
            loadout.damage
        };

        let mut targets = vec![first];
        let mut hit: HashSet<u32> = HashSet::from([first]);

        // Pierce: nearest enemies in a narrow cone behind the first target
        let pierce = (loadout.stats.pierce + stats.pierce) as usize;
        if pierce > 0 {
            let aim = state
                .enemy(first)
                .map_or(0.0, |e| angle_between(origin, e.pos));
            let mut cone: Vec<(f32, u32)> = state
                .enemies
                .iter()
                .filter(|e| !hit.contains(&e.id))
                .filter(|e| origin.distance(e.pos) < loadout.range)
                .filter(|e| {
                    wrap_angle(angle_between(origin, e.pos) - aim).abs() < combat.pierce_half_angle
                })
                .map(|e| (origin.distance(e.pos), e.id))
                .collect();
            cone.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            for (_, id) in cone.into_iter().take(pierce) {
                targets.push(id);
                hit.insert(id);
            }
        }

        // Chain: hop from the last target to the nearest unhit enemy
        let last = targets.last().and_then(|id| state.enemy(*id)).map(|e| e.pos);
        if let Some(mut from) = last {
            for _ in 0..stats.chain_count {
                let Some(next) = closest_enemy(&state.enemies, from, combat.chain_radius, &hit)
                else {
                    break;
                };
                targets.push(next);
                hit.insert(next);
                if let Some(e) = state.enemy(next) {
                    from = e.pos;
                }
            }
        }

        let mut total = 0.0;
        for (i, id) in targets.into_iter().enumerate() {
            let amount = if i == 0 {
                damage
            } else {
                damage * combat.beam_follow_up_factor
            };
            let Some(landed) = state.damage_enemy(id, amount, crit) else {
                continue;
            };
            total += amount;

            if stats.aoe_radius > 0.0 {
                let splash = damage * combat.splash_factor;
                for other in enemies_in_radius(&state.enemies, landed.pos, stats.aoe_radius) {
                    if !hit.contains(&other) {
                        state.damage_enemy(other, splash, false);
                    }
                }
            }
        }

        state.apply_lifesteal(total);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec2;

    use crate::catalog::weapons::INTERPRETER_BEAM;
    use crate::catalog::EnemyKind;
    use crate::sim::test_support::{place_enemy, session};
    use crate::sim::weapon::WeaponInstance;
    use crate::sim::{GameEvent, GameState};

    fn fire_beam(state: &mut GameState) {
        let def = Arc::clone(state.config.catalog.weapon(&INTERPRETER_BEAM.into()).unwrap());
        let mut beam = WeaponInstance::new(def);
        beam.update(state, 1000.0);
    }

    #[test]
    fn test_hits_nearest_only() {
        let mut state = session();
        let c = state.character.pos;
        let near = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(80.0, 0.0));
        let far = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(0.0, 120.0));
        fire_beam(&mut state);
        assert_eq!(state.enemy(near).unwrap().current_hp, 42.0);
        assert_eq!(state.enemy(far).unwrap().current_hp, 50.0);
    }

    #[test]
    fn test_out_of_range_does_nothing() {
        let mut state = session();
        let c = state.character.pos;
        let id = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(150.0, 0.0));
        fire_beam(&mut state);
        assert_eq!(state.enemy(id).unwrap().current_hp, 50.0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pierce_follows_the_line() {
        let mut state = session();
        state.character.stats.pierce = 1;
        let c = state.character.pos;
        let first = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(50.0, 0.0));
        let behind = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(100.0, 5.0));
        let aside = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(0.0, 90.0));
        fire_beam(&mut state);
        assert_eq!(state.enemy(first).unwrap().current_hp, 42.0);
        assert!((state.enemy(behind).unwrap().current_hp - 44.4).abs() < 1e-4);
        assert_eq!(state.enemy(aside).unwrap().current_hp, 50.0);
    }

    #[test]
    fn test_chain_and_lifesteal() {
        let mut state = session();
        state.character.stats.chain_count = 2;
        state.character.stats.lifesteal = 0.5;
        state.character.current_hp = 50.0;
        let c = state.character.pos;
        let a = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(60.0, 0.0));
        let b = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(160.0, 0.0));
        let d = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(260.0, 0.0));
        fire_beam(&mut state);
        assert_eq!(state.enemy(a).unwrap().current_hp, 42.0);
        assert!((state.enemy(b).unwrap().current_hp - 44.4).abs() < 1e-4);
        assert!((state.enemy(d).unwrap().current_hp - 44.4).abs() < 1e-4);
        // floor((8 + 5.6 + 5.6) * 0.5) = 9
        assert_eq!(state.character.current_hp, 59.0);
    }

    #[test]
    fn test_splash_skips_beam_targets() {
        let mut state = session();
        state.character.stats.aoe_radius = 30.0;
        let c = state.character.pos;
        let target = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(60.0, 0.0));
        let bystander = place_enemy(&mut state, EnemyKind::MemoryLeak, c + Vec2::new(70.0, 20.0));
        fire_beam(&mut state);
        assert_eq!(state.enemy(target).unwrap().current_hp, 42.0);
        assert_eq!(state.enemy(bystander).unwrap().current_hp, 46.0);
    }

    #[test]
    fn test_crit_doubles_damage_and_flags_event() {
        let mut state = session();
        state.character.stats.crit_chance = 0.8;
        let multiplier = state.config.tuning.combat.crit_multiplier;
        let c = state.character.pos;
        let spot = c + Vec2::new(60.0, 0.0);
        let id = place_enemy(&mut state, EnemyKind::MemoryLeak, spot);

        let mut crits = 0;
        for _ in 0..20 {
            let enemy = state.enemy_mut(id).unwrap();
            enemy.current_hp = 50.0;
            enemy.pos = spot;
            state.drain_events();
            fire_beam(&mut state);

            let Some(GameEvent::EnemyDamaged { amount, crit, .. }) = state
                .events
                .iter()
                .find(|e| matches!(e, GameEvent::EnemyDamaged { .. }))
                .cloned()
            else {
                panic!("beam missed");
            };
            let expected = if crit { 8.0 * multiplier } else { 8.0 };
            assert_eq!(amount, expected);
            assert_eq!(state.enemy(id).unwrap().current_hp, 50.0 - expected);
            if crit {
                crits += 1;
            }
        }
        assert!(crits > 0);
        assert_eq!(multiplier, 2.0);
    }
}
