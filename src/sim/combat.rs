//! Shared combat resolution
//!
//! Target queries are plain functions over the enemy list. Damage goes
//! through [`GameState::damage_enemy`], which owns the kill side effects:
//! XP drop, boss flag, and death explosions (which may cascade).

use std::collections::HashSet;

use glam::Vec2;

use super::enemy::Enemy;
use super::event::GameEvent;
use super::state::GameState;

/// Nearest enemy strictly closer than `range`, skipping `exclude`
pub fn closest_enemy(
    enemies: &[Enemy],
    from: Vec2,
    range: f32,
    exclude: &HashSet<u32>,
) -> Option<u32> {
    let mut best: Option<(f32, u32)> = None;
    for enemy in enemies {
        if exclude.contains(&enemy.id) {
            continue;
        }
        let dist = from.distance(enemy.pos);
        if dist < range && best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, enemy.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Every enemy within `radius` (inclusive) of `center`
pub fn enemies_in_radius(enemies: &[Enemy], center: Vec2, radius: f32) -> Vec<u32> {
    enemies
        .iter()
        .filter(|e| center.distance(e.pos) <= radius)
        .map(|e| e.id)
        .collect()
}

/// Result of one successful hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Position after knockback (or where it died)
    pub pos: Vec2,
    pub killed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Blast {
    pos: Vec2,
    damage: f32,
}

impl GameState {
    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Damage a live enemy. Returns `None` if `id` is not on the field
    /// (already dead or never existed).
    pub fn damage_enemy(&mut self, id: u32, amount: f32, crit: bool) -> Option<Hit> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        let (hit, blast) = self.strike(index, amount, crit);
        if let Some(blast) = blast {
            self.detonate(blast);
        }
        Some(hit)
    }

    /// Heal the character for one attack resolution's worth of damage
    pub fn apply_lifesteal(&mut self, total_damage: f32) {
        let healed = self.character.on_deal_damage(total_damage);
        if healed > 0.0 {
            self.events.push(GameEvent::CharacterHealed {
                amount: healed,
                hp: self.character.current_hp,
            });
        }
    }

    fn strike(&mut self, index: usize, amount: f32, crit: bool) -> (Hit, Option<Blast>) {
        let from = self.character.pos;
        let knockback = self.config.tuning.combat.hit_knockback;

        let enemy = &mut self.enemies[index];
        let killed = enemy.take_damage(amount, from, knockback);
        let (id, pos) = (enemy.id, enemy.pos);
        self.events.push(GameEvent::EnemyDamaged {
            id,
            amount,
            pos,
            crit,
        });

        if !killed {
            return (Hit { pos, killed }, None);
        }
        let dead = self.enemies.remove(index);
        (Hit { pos, killed }, self.on_kill(&dead))
    }

    fn on_kill(&mut self, dead: &Enemy) -> Option<Blast> {
        self.events.push(GameEvent::EnemyKilled {
            id: dead.id,
            kind: dead.kind,
            pos: dead.pos,
        });
        self.drop_pickup(dead.pos, dead.xp_value);

        if dead.is_boss() && !self.boss_defeated {
            self.boss_defeated = true;
            log::info!("boss defeated at {:.1}s", self.elapsed_ms / 1000.0);
            self.events.push(GameEvent::BossDefeated);
        }

        let share = self.character.stats.explosion_damage;
        (share > 0.0).then(|| Blast {
            pos: dead.pos,
            damage: dead.max_hp * share,
        })
    }

    /// Resolve a death explosion and any explosions it sets off. Each enemy
    /// dies once, so the queue drains.
    fn detonate(&mut self, first: Blast) {
        let radius = self.config.tuning.combat.explosion_radius;
        let mut pending = vec![first];
        while let Some(blast) = pending.pop() {
            for id in enemies_in_radius(&self.enemies, blast.pos, radius) {
                let Some(index) = self.enemies.iter().position(|e| e.id == id) else {
                    continue;
                };
                if let (_, Some(next)) = self.strike(index, blast.damage, false) {
                    pending.push(next);
                }
            }
        }
    }
}
