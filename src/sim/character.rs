//! The player character and its stat table
//!
//! Multiplier upgrades add to the multiplier (two +12% upgrades give ×1.24).
//! Armor and crit chance are clamped to their caps on every change; the
//! other accumulators are plain sums.

use std::sync::Arc;

use glam::Vec2;
use serde::Serialize;

use super::weapon::WeaponInstance;
use crate::catalog::{UpgradeStat, WeaponDefinition, WeaponId};
use crate::tuning::{PlayerTuning, ProgressionTuning, WorldTuning};

/// Multipliers and accumulators modified by upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatTable {
    pub damage_multiplier: f32,
    pub speed_multiplier: f32,
    pub attack_speed_multiplier: f32,
    pub range_multiplier: f32,
    pub xp_multiplier: f32,
    /// Incoming damage reduction, 0..=armor cap
    pub armor: f32,
    /// HP healed per regen interval
    pub hp_regen: f32,
    /// Share of dealt damage returned as HP
    pub lifesteal: f32,
    pub pierce: u32,
    pub projectiles: u32,
    pub aoe_radius: f32,
    pub chain_count: u32,
    /// Share of a victim's max HP dealt around it on death
    pub explosion_damage: f32,
    pub crit_chance: f32,
    /// Added to the base magnet radius
    pub magnet_range: f32,
    /// Added to the invincibility window (ms)
    pub invincibility_bonus: f32,
}

impl StatTable {
    pub fn new(xp_multiplier: f32) -> Self {
        Self {
            damage_multiplier: 1.0,
            speed_multiplier: 1.0,
            attack_speed_multiplier: 1.0,
            range_multiplier: 1.0,
            xp_multiplier,
            armor: 0.0,
            hp_regen: 0.0,
            lifesteal: 0.0,
            pierce: 0,
            projectiles: 1,
            aoe_radius: 0.0,
            chain_count: 0,
            explosion_damage: 0.0,
            crit_chance: 0.0,
            magnet_range: 0.0,
            invincibility_bonus: 0.0,
        }
    }
}

fn add_count(count: u32, value: f32) -> u32 {
    count.saturating_add(value.round().max(0.0) as u32)
}

/// XP needed to finish `level`
pub fn xp_for_level(level: u32, tuning: &ProgressionTuning) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    (tuning.base_xp as f64 * (tuning.xp_scaling as f64).powi(exponent)).floor() as u32
}

/// Result of granting a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// First copy, created at level 1
    Acquired,
    /// Already owned, now at this level
    Leveled(u32),
    /// Already owned at max level, nothing changed
    AlreadyMax,
}

#[derive(Debug, Clone, Serialize)]
pub struct Character {
    pub pos: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub max_hp: f32,
    pub current_hp: f32,
    pub level: u32,
    pub current_xp: u32,
    pub stats: StatTable,
    /// One instance per weapon identity, in acquisition order
    pub weapons: Vec<WeaponInstance>,
    /// Remaining invincibility (ms); invincible while > 0
    pub invincible_ms: f32,
    regen_timer_ms: f32,
    /// Ids of every upgrade chosen this run
    pub taken_upgrades: Vec<String>,
}

impl Character {
    pub fn new(tuning: &PlayerTuning, world: &WorldTuning) -> Self {
        Self {
            pos: Vec2::new(world.width / 2.0, world.height / 2.0),
            radius: tuning.collision_radius,
            base_speed: tuning.base_speed,
            max_hp: tuning.base_hp,
            current_hp: tuning.base_hp,
            level: 1,
            current_xp: 0,
            stats: StatTable::new(tuning.xp_multiplier),
            weapons: Vec::new(),
            invincible_ms: 0.0,
            regen_timer_ms: 0.0,
            taken_upgrades: Vec::new(),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    /// Apply incoming damage after armor. Returns the HP actually lost, or
    /// `None` when the hit was ignored (invincible, or a non-positive amount).
    pub fn take_damage(&mut self, amount: f32, tuning: &PlayerTuning) -> Option<f32> {
        if self.is_invincible() || !(amount > 0.0) {
            return None;
        }
        let reduced = (amount * (1.0 - self.stats.armor)).max(tuning.min_contact_damage);
        let before = self.current_hp;
        self.current_hp = (self.current_hp - reduced).clamp(0.0, self.max_hp);
        self.invincible_ms = tuning.invincibility_ms + self.stats.invincibility_bonus;
        Some(before - self.current_hp)
    }

    /// Heal up to max HP; returns the HP actually restored. A dead character
    /// stays dead.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !(amount > 0.0) || self.is_dead() {
            return 0.0;
        }
        let before = self.current_hp;
        self.current_hp = (self.current_hp + amount).clamp(0.0, self.max_hp);
        self.current_hp - before
    }

    /// Lifesteal for one attack resolution
    pub fn on_deal_damage(&mut self, total_damage: f32) -> f32 {
        if self.stats.lifesteal <= 0.0 {
            return 0.0;
        }
        let amount = (total_damage * self.stats.lifesteal).floor();
        self.heal(amount)
    }

    /// Advance regen and invincibility timers; returns HP regenerated
    pub fn update_timers(&mut self, dt_ms: f32, tuning: &PlayerTuning) -> f32 {
        self.invincible_ms = (self.invincible_ms - dt_ms).max(0.0);

        if self.stats.hp_regen > 0.0 && self.current_hp < self.max_hp {
            self.regen_timer_ms += dt_ms;
            if self.regen_timer_ms >= tuning.regen_interval_ms {
                self.regen_timer_ms = 0.0;
                return self.heal(self.stats.hp_regen);
            }
        }
        0.0
    }

    /// Move along a normalized input direction, staying inside the world
    pub fn move_toward(&mut self, direction: Vec2, dt_ms: f32, world: &WorldTuning) {
        let speed = self.base_speed * self.stats.speed_multiplier;
        let dir = if direction.is_finite() {
            direction.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        self.pos += dir * speed * (dt_ms / 1000.0);
        self.pos = self.pos.clamp(
            Vec2::splat(self.radius),
            Vec2::new(world.width - self.radius, world.height - self.radius),
        );
    }

    pub fn magnet_range(&self, tuning: &ProgressionTuning) -> f32 {
        tuning.base_magnet_radius + self.stats.magnet_range
    }

    pub fn xp_to_next_level(&self, tuning: &ProgressionTuning) -> u32 {
        xp_for_level(self.level, tuning)
    }

    /// Add collected XP (scaled by the XP multiplier, floored); returns the amount added
    pub fn add_xp(&mut self, raw: u32) -> u32 {
        let gained = (raw as f64 * self.stats.xp_multiplier as f64).floor().max(0.0) as u32;
        self.current_xp = self.current_xp.saturating_add(gained);
        gained
    }

    /// Consume one level's worth of XP if available. At most one level per call.
    pub fn try_level_up(&mut self, tuning: &ProgressionTuning) -> bool {
        let needed = self.xp_to_next_level(tuning);
        if self.current_xp >= needed {
            self.current_xp -= needed;
            self.level += 1;
            true
        } else {
            false
        }
    }

    /// Apply a stat upgrade. Weapon grants go through [`Character::acquire_weapon`].
    pub fn apply_stat(&mut self, stat: UpgradeStat, value: f32, tuning: &PlayerTuning) {
        let s = &mut self.stats;
        match stat {
            UpgradeStat::Damage => s.damage_multiplier += value,
            UpgradeStat::Speed => s.speed_multiplier += value,
            UpgradeStat::AttackSpeed => s.attack_speed_multiplier += value,
            UpgradeStat::Range => s.range_multiplier += value,
            UpgradeStat::XpGain => s.xp_multiplier += value,
            UpgradeStat::MaxHp => {
                self.max_hp = (self.max_hp + value).max(1.0);
                self.current_hp = (self.current_hp + value).clamp(0.0, self.max_hp);
            }
            UpgradeStat::HpRegen => s.hp_regen += value,
            UpgradeStat::Armor => s.armor = (s.armor + value).clamp(0.0, tuning.armor_cap),
            UpgradeStat::Lifesteal => s.lifesteal += value,
            UpgradeStat::InvincibilityDuration => s.invincibility_bonus += value,
            UpgradeStat::Pierce => s.pierce = add_count(s.pierce, value),
            UpgradeStat::Projectiles => s.projectiles = add_count(s.projectiles, value),
            UpgradeStat::AoeRadius => s.aoe_radius += value,
            UpgradeStat::ChainCount => s.chain_count = add_count(s.chain_count, value),
            UpgradeStat::ExplosionDamage => s.explosion_damage += value,
            UpgradeStat::CritChance => {
                s.crit_chance = (s.crit_chance + value).clamp(0.0, tuning.crit_cap)
            }
            UpgradeStat::MagnetRange => s.magnet_range += value,
            UpgradeStat::Weapon => {
                log::warn!("weapon upgrade applied as a stat; ignoring");
            }
        }
    }

    pub fn weapon(&self, id: &WeaponId) -> Option<&WeaponInstance> {
        self.weapons.iter().find(|w| w.id() == id)
    }

    pub fn has_weapon(&self, id: &WeaponId) -> bool {
        self.weapon(id).is_some()
    }

    pub fn weapon_level(&self, id: &WeaponId) -> u32 {
        self.weapon(id).map_or(0, WeaponInstance::level)
    }

    /// Grant a weapon, or level it up if already owned
    pub fn acquire_weapon(&mut self, definition: &Arc<WeaponDefinition>) -> Acquisition {
        match self.weapons.iter_mut().find(|w| w.id() == &definition.id) {
            Some(existing) => {
                if existing.level_up() {
                    Acquisition::Leveled(existing.level())
                } else {
                    Acquisition::AlreadyMax
                }
            }
            None => {
                self.weapons.push(WeaponInstance::new(Arc::clone(definition)));
                Acquisition::Acquired
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, weapons::SEGFAULT};
    use crate::tuning::Tuning;

    fn character() -> (Character, Tuning) {
        let tuning = Tuning::default();
        (Character::new(&tuning.player, &tuning.world), tuning)
    }

    #[test]
    fn test_lethal_hit_clamps_to_zero() {
        let (mut c, tuning) = character();
        c.level = 5;
        c.current_hp = 15.0;
        let lost = c.take_damage(20.0, &tuning.player).unwrap();
        assert_eq!(c.current_hp, 0.0);
        assert_eq!(lost, 15.0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_armor_and_minimum_damage() {
        let (mut c, tuning) = character();
        c.apply_stat(UpgradeStat::Armor, 0.5, &tuning.player);
        assert_eq!(c.take_damage(10.0, &tuning.player), Some(5.0));

        // Invincible right after a hit
        assert_eq!(c.take_damage(10.0, &tuning.player), None);
        c.update_timers(tuning.player.invincibility_ms, &tuning.player);
        assert!(!c.is_invincible());

        // Tiny hits still hurt for the minimum
        assert_eq!(c.take_damage(0.5, &tuning.player), Some(1.0));
    }

    #[test]
    fn test_negative_damage_and_heal_are_ignored() {
        let (mut c, tuning) = character();
        assert_eq!(c.take_damage(-50.0, &tuning.player), None);
        assert_eq!(c.take_damage(f32::NAN, &tuning.player), None);
        assert_eq!(c.heal(-50.0), 0.0);
        assert_eq!(c.current_hp, 100.0);
        assert!(!c.is_invincible());
    }

    #[test]
    fn test_heal_caps_at_max() {
        let (mut c, _) = character();
        c.current_hp = 90.0;
        assert_eq!(c.heal(f32::INFINITY), 10.0);
        assert_eq!(c.current_hp, c.max_hp);
    }

    #[test]
    fn test_dead_character_is_not_healed() {
        let (mut c, _) = character();
        c.current_hp = 0.0;
        c.stats.lifesteal = 0.5;
        assert_eq!(c.heal(30.0), 0.0);
        assert_eq!(c.on_deal_damage(100.0), 0.0);
        assert!(c.is_dead());
    }

    #[test]
    fn test_caps_hold_under_stacking() {
        let (mut c, tuning) = character();
        for _ in 0..20 {
            c.apply_stat(UpgradeStat::Armor, 0.2, &tuning.player);
            c.apply_stat(UpgradeStat::CritChance, 0.2, &tuning.player);
        }
        assert_eq!(c.stats.armor, 0.8);
        assert_eq!(c.stats.crit_chance, 0.8);
    }

    #[test]
    fn test_multipliers_stack_additively() {
        let (mut c, tuning) = character();
        c.apply_stat(UpgradeStat::Damage, 0.12, &tuning.player);
        c.apply_stat(UpgradeStat::Damage, 0.12, &tuning.player);
        assert!((c.stats.damage_multiplier - 1.24).abs() < 1e-6);
    }

    #[test]
    fn test_max_hp_upgrade_raises_current() {
        let (mut c, tuning) = character();
        c.current_hp = 50.0;
        c.apply_stat(UpgradeStat::MaxHp, 15.0, &tuning.player);
        assert_eq!(c.max_hp, 115.0);
        assert_eq!(c.current_hp, 65.0);
    }

    #[test]
    fn test_xp_multiplier_floors() {
        let (mut c, _) = character();
        assert_eq!(c.stats.xp_multiplier, 1.1);
        assert_eq!(c.add_xp(10), 11);
        assert_eq!(c.current_xp, 11);
    }

    #[test]
    fn test_xp_curve() {
        let tuning = Tuning::default();
        assert_eq!(xp_for_level(1, &tuning.progression), 8);
        assert_eq!(xp_for_level(2, &tuning.progression), 10);
        assert_eq!(xp_for_level(3, &tuning.progression), 12);
    }

    #[test]
    fn test_single_level_per_check() {
        let (mut c, tuning) = character();
        c.current_xp = 100;
        assert!(c.try_level_up(&tuning.progression));
        assert_eq!(c.level, 2);
        assert_eq!(c.current_xp, 92);
    }

    #[test]
    fn test_regen_ticks_once_per_interval() {
        let (mut c, tuning) = character();
        c.stats.hp_regen = 2.0;
        c.current_hp = 50.0;
        assert_eq!(c.update_timers(600.0, &tuning.player), 0.0);
        assert_eq!(c.update_timers(400.0, &tuning.player), 2.0);
        assert_eq!(c.current_hp, 52.0);
    }

    #[test]
    fn test_move_clamps_to_world() {
        let (mut c, tuning) = character();
        c.pos = Vec2::new(10.0, 1000.0);
        c.move_toward(Vec2::new(-1.0, 0.0), 1000.0, &tuning.world);
        assert_eq!(c.pos.x, c.radius);
        c.move_toward(Vec2::new(0.0, 5.0), 1000.0, &tuning.world);
        assert_eq!(c.pos.y, 1180.0);
    }

    #[test]
    fn test_reacquire_levels_instead_of_duplicating() {
        let (mut c, _) = character();
        let catalog = Catalog::builtin();
        let segfault = catalog.weapon(&SEGFAULT.into()).unwrap();

        assert_eq!(c.acquire_weapon(segfault), Acquisition::Acquired);
        for level in 2..=5 {
            assert_eq!(c.acquire_weapon(segfault), Acquisition::Leveled(level));
        }
        assert_eq!(c.acquire_weapon(segfault), Acquisition::AlreadyMax);
        assert_eq!(c.weapons.len(), 1);
        assert_eq!(c.weapon_level(&SEGFAULT.into()), 5);
    }
}
