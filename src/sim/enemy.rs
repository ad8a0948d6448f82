//! Enemies and the time-based difficulty curve

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::catalog::{EnemyKind, EnemyStats};
use crate::consts::MS_PER_MINUTE;
use crate::tuning::SpawnTuning;

/// HP multiplier for enemies spawned at `elapsed_ms`
pub fn hp_multiplier(elapsed_ms: f64, tuning: &SpawnTuning) -> f32 {
    let minutes = (elapsed_ms / MS_PER_MINUTE) as f32;
    (1.0 + minutes * tuning.hp_scale_per_minute).min(tuning.max_hp_scale)
}

/// Pick a regular enemy kind from the minute-based table
pub fn select_kind(elapsed_ms: f64, rng: &mut Pcg32) -> EnemyKind {
    let minutes = elapsed_ms / MS_PER_MINUTE;
    if minutes < 1.0 {
        return EnemyKind::NullPointer;
    }
    let roll: f32 = rng.random();
    if minutes < 2.0 {
        if roll < 0.7 {
            EnemyKind::NullPointer
        } else {
            EnemyKind::RaceCondition
        }
    } else if roll < 0.5 {
        EnemyKind::NullPointer
    } else if roll < 0.8 {
        EnemyKind::RaceCondition
    } else {
        EnemyKind::MemoryLeak
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub max_hp: f32,
    pub current_hp: f32,
    /// Contact damage
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub radius: f32,
}

impl Enemy {
    /// Create an enemy with its HP scaled by `hp_mult`. Bosses only take part
    /// of the scaling.
    pub fn spawn(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        stats: &EnemyStats,
        hp_mult: f32,
        tuning: &SpawnTuning,
    ) -> Self {
        let excess = (hp_mult - 1.0).max(0.0);
        let scale = if kind.is_boss() {
            1.0 + excess * tuning.boss_hp_scale_share
        } else {
            hp_mult.max(1.0)
        };
        let max_hp = (stats.hp * scale).floor().max(1.0);
        let xp_bonus = (excess * tuning.xp_bonus_share).floor() as u32;

        Self {
            id,
            kind,
            pos,
            max_hp,
            current_hp: max_hp,
            damage: stats.damage,
            speed: stats.speed,
            xp_value: stats.xp_value + xp_bonus,
            radius: stats.radius,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0.0
    }

    /// Walk straight at `target` without overshooting it
    pub fn seek(&mut self, target: Vec2, dt_ms: f32) {
        let offset = target - self.pos;
        let step = self.speed * (dt_ms / 1000.0);
        let distance = offset.length();
        if distance <= step {
            self.pos = target;
        } else {
            self.pos += offset / distance * step;
        }
    }

    /// Apply damage and push the enemy `knockback` units away from `from`.
    /// Returns true when this hit killed it.
    pub fn take_damage(&mut self, amount: f32, from: Vec2, knockback: f32) -> bool {
        if self.is_dead() || !(amount > 0.0) {
            return false;
        }
        self.current_hp = (self.current_hp - amount).max(0.0);
        push_away(&mut self.pos, from, knockback);
        self.is_dead()
    }
}

/// Move `pos` `distance` units directly away from `from`
pub fn push_away(pos: &mut Vec2, from: Vec2, distance: f32) {
    let dir = (*pos - from).normalize_or_zero();
    *pos += dir * distance;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EnemyTable;
    use rand::SeedableRng;

    #[test]
    fn test_hp_multiplier_ramp_and_cap() {
        let tuning = SpawnTuning::default();
        assert_eq!(hp_multiplier(0.0, &tuning), 1.0);
        assert!((hp_multiplier(120_000.0, &tuning) - 1.16).abs() < 1e-5);
        assert_eq!(hp_multiplier(60.0 * 60_000.0, &tuning), 2.5);
    }

    #[test]
    fn test_scaled_hp_is_floored() {
        let table = EnemyTable::default();
        let tuning = SpawnTuning::default();
        let e = Enemy::spawn(
            1,
            EnemyKind::NullPointer,
            Vec2::ZERO,
            &table.null_pointer,
            1.16,
            &tuning,
        );
        assert_eq!(e.max_hp, 13.0);
        assert_eq!(e.current_hp, 13.0);

        let boss = Enemy::spawn(2, EnemyKind::Boss, Vec2::ZERO, &table.boss, 2.0, &tuning);
        assert_eq!(boss.max_hp, 750.0);
    }

    #[test]
    fn test_first_minute_is_null_pointers_only() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(select_kind(59_999.0, &mut rng), EnemyKind::NullPointer);
        }
    }

    #[test]
    fn test_memory_leaks_appear_after_two_minutes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let early = (0..500).any(|_| select_kind(90_000.0, &mut rng) == EnemyKind::MemoryLeak);
        let late = (0..500).any(|_| select_kind(150_000.0, &mut rng) == EnemyKind::MemoryLeak);
        assert!(!early);
        assert!(late);
    }

    #[test]
    fn test_seek_does_not_overshoot() {
        let table = EnemyTable::default();
        let tuning = SpawnTuning::default();
        let mut e = Enemy::spawn(
            1,
            EnemyKind::NullPointer,
            Vec2::ZERO,
            &table.null_pointer,
            1.0,
            &tuning,
        );
        e.seek(Vec2::new(100.0, 0.0), 1000.0);
        assert_eq!(e.pos, Vec2::new(50.0, 0.0));
        e.seek(Vec2::new(60.0, 0.0), 1000.0);
        assert_eq!(e.pos, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn test_hit_knocks_back() {
        let table = EnemyTable::default();
        let tuning = SpawnTuning::default();
        let pos = Vec2::new(10.0, 0.0);
        let mut e = Enemy::spawn(
            1,
            EnemyKind::NullPointer,
            pos,
            &table.null_pointer,
            1.0,
            &tuning,
        );
        assert!(!e.take_damage(5.0, Vec2::ZERO, 5.0));
        assert_eq!(e.pos, Vec2::new(15.0, 0.0));
        assert!(e.take_damage(100.0, Vec2::ZERO, 5.0));
        assert_eq!(e.current_hp, 0.0);
        // Already dead
        assert!(!e.take_damage(100.0, Vec2::ZERO, 5.0));
    }
}
