//! Weapon definitions and level progression

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Weapon identity, e.g. `INTERPRETER_BEAM`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(String);

impl WeaponId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeaponId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

pub const INTERPRETER_BEAM: &str = "INTERPRETER_BEAM";
pub const STACK_OVERFLOW: &str = "STACK_OVERFLOW";
pub const GARBAGE_COLLECTOR: &str = "GARBAGE_COLLECTOR";
pub const FORK_BOMB: &str = "FORK_BOMB";
pub const SEGFAULT: &str = "SEGFAULT";

/// Weapon behavior family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Hit-scan to the nearest enemy, with pierce/chain/splash from character stats
    Beam,
    /// Burst around the character with knockback
    Aoe,
    /// Revolving orbitals dealing contact damage every tick
    Orbit,
    /// Fan of single-hit bolts
    Projectile,
    /// Lightning hopping between nearby enemies
    Chain,
}

/// Weapon numbers at a given level (before character multipliers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponStats {
    pub damage: f32,
    /// Attacks per second; 0 means continuous (no cooldown)
    pub attack_speed: f32,
    pub range: f32,
    pub pierce: u32,
    pub projectiles: u32,
    pub projectile_speed: f32,
    pub aoe_radius: f32,
    pub knockback: f32,
    pub chain_count: u32,
    pub chain_falloff: f32,
    pub orbit_count: u32,
    pub orbit_radius: f32,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self {
            damage: 0.0,
            attack_speed: 0.0,
            range: 0.0,
            pierce: 0,
            projectiles: 0,
            projectile_speed: 300.0,
            aoe_radius: 0.0,
            knockback: 0.0,
            chain_count: 0,
            chain_falloff: 0.7,
            orbit_count: 0,
            orbit_radius: 0.0,
        }
    }
}

/// Additive deltas granted by one weapon level
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelBonus {
    pub damage: f32,
    pub attack_speed: f32,
    pub range: f32,
    pub pierce: u32,
    pub projectiles: u32,
    pub aoe_radius: f32,
    pub knockback: f32,
    pub chain_count: u32,
    pub orbit_count: u32,
    pub orbit_radius: f32,
}

impl LevelBonus {
    fn has_negative(&self) -> bool {
        [
            self.damage,
            self.attack_speed,
            self.range,
            self.aoe_radius,
            self.knockback,
            self.orbit_radius,
        ]
        .iter()
        .any(|v| *v < 0.0)
    }
}

impl WeaponStats {
    fn apply(&mut self, bonus: &LevelBonus) {
        self.damage += bonus.damage;
        self.attack_speed += bonus.attack_speed;
        self.range += bonus.range;
        self.pierce += bonus.pierce;
        self.projectiles += bonus.projectiles;
        self.aoe_radius += bonus.aoe_radius;
        self.knockback += bonus.knockback;
        self.chain_count += bonus.chain_count;
        self.orbit_count += bonus.orbit_count;
        self.orbit_radius += bonus.orbit_radius;
    }
}

/// Immutable weapon definition shared by every instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub id: WeaponId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub archetype: Archetype,
    pub max_level: u32,
    pub base: WeaponStats,
    /// Index 0 is applied on reaching level 2, index 1 on level 3, ...
    #[serde(default)]
    pub level_bonuses: Vec<LevelBonus>,
}

impl WeaponDefinition {
    /// Base stats plus every bonus up to `level` (levels past the table are ignored)
    pub fn stats_at(&self, level: u32) -> WeaponStats {
        let mut stats = self.base;
        let achieved = level.saturating_sub(1) as usize;
        for bonus in self.level_bonuses.iter().take(achieved) {
            stats.apply(bonus);
        }
        stats
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let expected = self.max_level.saturating_sub(1) as usize;
        if self.max_level == 0 || self.level_bonuses.len() != expected {
            return Err(ConfigError::LevelBonusMismatch {
                id: self.id.clone(),
                max_level: self.max_level,
                bonuses: self.level_bonuses.len(),
            });
        }
        if let Some(i) = self.level_bonuses.iter().position(LevelBonus::has_negative) {
            return Err(ConfigError::NegativeLevelBonus {
                id: self.id.clone(),
                level: i as u32 + 2,
            });
        }
        Ok(())
    }
}

fn bonus(damage: f32) -> LevelBonus {
    LevelBonus {
        damage,
        ..Default::default()
    }
}

/// The five shipped weapons
pub fn builtin_weapons() -> Vec<WeaponDefinition> {
    vec![
        WeaponDefinition {
            id: INTERPRETER_BEAM.into(),
            name: "Interpreter Beam".into(),
            description: "Auto-targeting beam that parses enemies".into(),
            archetype: Archetype::Beam,
            max_level: 5,
            base: WeaponStats {
                damage: 8.0,
                attack_speed: 6.0,
                range: 150.0,
                ..Default::default()
            },
            level_bonuses: vec![
                LevelBonus { range: 20.0, ..bonus(3.0) },
                LevelBonus { pierce: 1, ..bonus(4.0) },
                LevelBonus { attack_speed: 1.0, ..bonus(5.0) },
                LevelBonus { pierce: 2, range: 30.0, ..bonus(8.0) },
            ],
        },
        WeaponDefinition {
            id: STACK_OVERFLOW.into(),
            name: "Stack Overflow".into(),
            description: "Explosive AOE that crashes nearby enemies".into(),
            archetype: Archetype::Aoe,
            max_level: 5,
            base: WeaponStats {
                damage: 15.0,
                attack_speed: 1.5,
                aoe_radius: 80.0,
                knockback: 100.0,
                ..Default::default()
            },
            level_bonuses: vec![
                LevelBonus { aoe_radius: 15.0, ..bonus(5.0) },
                LevelBonus { knockback: 50.0, ..bonus(8.0) },
                LevelBonus { aoe_radius: 20.0, attack_speed: 0.3, ..bonus(10.0) },
                LevelBonus { aoe_radius: 30.0, knockback: 100.0, ..bonus(15.0) },
            ],
        },
        WeaponDefinition {
            id: GARBAGE_COLLECTOR.into(),
            name: "Garbage Collector".into(),
            description: "Orbiting projectiles that clean up bugs".into(),
            archetype: Archetype::Orbit,
            max_level: 5,
            base: WeaponStats {
                damage: 5.0,
                orbit_count: 3,
                orbit_radius: 60.0,
                ..Default::default()
            },
            level_bonuses: vec![
                LevelBonus { orbit_count: 1, ..bonus(2.0) },
                LevelBonus { orbit_radius: 15.0, ..bonus(3.0) },
                LevelBonus { orbit_count: 2, ..bonus(4.0) },
                LevelBonus { orbit_count: 2, orbit_radius: 20.0, ..bonus(6.0) },
            ],
        },
        WeaponDefinition {
            id: FORK_BOMB.into(),
            name: "Fork Bomb".into(),
            description: "Fires spreading projectiles that multiply".into(),
            archetype: Archetype::Projectile,
            max_level: 5,
            base: WeaponStats {
                damage: 6.0,
                attack_speed: 2.0,
                range: 200.0,
                projectiles: 3,
                projectile_speed: 300.0,
                ..Default::default()
            },
            level_bonuses: vec![
                LevelBonus { projectiles: 1, ..bonus(2.0) },
                LevelBonus { range: 30.0, ..bonus(3.0) },
                LevelBonus { projectiles: 2, attack_speed: 0.3, ..bonus(4.0) },
                LevelBonus { projectiles: 2, range: 50.0, ..bonus(6.0) },
            ],
        },
        WeaponDefinition {
            id: SEGFAULT.into(),
            name: "Segfault".into(),
            description: "Lightning that chains between enemies".into(),
            archetype: Archetype::Chain,
            max_level: 5,
            base: WeaponStats {
                damage: 10.0,
                attack_speed: 2.0,
                range: 180.0,
                chain_count: 3,
                chain_falloff: 0.7,
                ..Default::default()
            },
            level_bonuses: vec![
                LevelBonus { chain_count: 1, ..bonus(3.0) },
                LevelBonus { range: 25.0, ..bonus(4.0) },
                LevelBonus { chain_count: 2, attack_speed: 0.3, ..bonus(6.0) },
                LevelBonus { chain_count: 2, range: 40.0, ..bonus(10.0) },
            ],
        },
    ]
}
