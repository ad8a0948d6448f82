//! Upgrade catalog
//!
//! Tier 1 is available from the start, tier 2 from level 6 and tier 3 from
//! level 10 (thresholds live in [`crate::tuning::OfferTuning`]).

use serde::{Deserialize, Serialize};

use super::weapons::{FORK_BOMB, GARBAGE_COLLECTOR, SEGFAULT, STACK_OVERFLOW, WeaponId};

/// Character stat an upgrade modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeStat {
    Damage,
    Speed,
    AttackSpeed,
    MaxHp,
    Range,
    XpGain,
    HpRegen,
    Armor,
    Lifesteal,
    InvincibilityDuration,
    Pierce,
    Projectiles,
    AoeRadius,
    ChainCount,
    ExplosionDamage,
    CritChance,
    MagnetRange,
    /// Grants the entry's weapon, or levels it if already owned
    Weapon,
}

/// Display grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    Paradigm,
    Optimization,
    Tooling,
    Defense,
    Weapon,
}

/// One entry of the upgrade catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub category: UpgradeCategory,
    pub stat: UpgradeStat,
    #[serde(default)]
    pub value: f32,
    pub tier: u8,
    /// Can be picked more than once
    #[serde(default)]
    pub stackable: bool,
    /// Weapon granted or leveled by this entry
    #[serde(default)]
    pub weapon: Option<WeaponId>,
}

impl UpgradeEntry {
    pub fn is_weapon_grant(&self) -> bool {
        self.weapon.is_some()
    }
}

#[allow(clippy::too_many_arguments)]
fn stat(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    category: UpgradeCategory,
    stat: UpgradeStat,
    value: f32,
    tier: u8,
    stackable: bool,
) -> UpgradeEntry {
    UpgradeEntry {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
        category,
        stat,
        value,
        tier,
        stackable,
        weapon: None,
    }
}

fn weapon(id: &str, name: &str, description: &str, icon: &str, weapon: &str) -> UpgradeEntry {
    UpgradeEntry {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        icon: icon.into(),
        category: UpgradeCategory::Weapon,
        stat: UpgradeStat::Weapon,
        value: 0.0,
        tier: 1,
        stackable: false,
        weapon: Some(weapon.into()),
    }
}

/// The shipped upgrade catalog
pub fn builtin_upgrades() -> Vec<UpgradeEntry> {
    use UpgradeCategory::*;
    use UpgradeStat as S;

    vec![
        // Tier 1
        stat(
            "damage_1",
            "Sharper Code",
            "Cleaner syntax hits harder",
            "///",
            Optimization,
            S::Damage,
            0.12,
            1,
            true,
        ),
        stat(
            "speed_1",
            "Async Movement",
            "Non-blocking locomotion",
            ">>",
            Paradigm,
            S::Speed,
            0.12,
            1,
            true,
        ),
        stat(
            "attack_speed_1",
            "Hot Reload",
            "Faster execution cycles",
            "~",
            Optimization,
            S::AttackSpeed,
            0.15,
            1,
            true,
        ),
        stat(
            "hp_1",
            "Error Handling",
            "Try-catch for your life",
            "{}",
            Defense,
            S::MaxHp,
            15.0,
            1,
            true,
        ),
        stat(
            "range_1",
            "Long Range Import",
            "Reach distant modules",
            "=>",
            Tooling,
            S::Range,
            0.15,
            1,
            true,
        ),
        stat(
            "xp_1",
            "Learning Rate",
            "Absorb knowledge faster",
            "++",
            Optimization,
            S::XpGain,
            0.12,
            1,
            true,
        ),
        weapon(
            "weapon_stack_overflow",
            "Stack Overflow",
            "AOE explosion around you",
            "!!",
            STACK_OVERFLOW,
        ),
        weapon(
            "weapon_garbage_collector",
            "Garbage Collector",
            "Orbiting projectiles clean up bugs",
            "GC",
            GARBAGE_COLLECTOR,
        ),
        weapon(
            "weapon_fork_bomb",
            "Fork Bomb",
            "Spread projectiles that multiply",
            ":()",
            FORK_BOMB,
        ),
        weapon("weapon_segfault", "Segfault", "Chain lightning between enemies", "zZ", SEGFAULT),
        // Tier 2
        stat(
            "damage_2",
            "Optimized Build",
            "Production-ready damage",
            "-O3",
            Optimization,
            S::Damage,
            0.25,
            2,
            true,
        ),
        stat(
            "attack_speed_2",
            "JIT Compiler",
            "Just-in-time attacks",
            "JIT",
            Optimization,
            S::AttackSpeed,
            0.25,
            2,
            true,
        ),
        stat(
            "regen_1",
            "Garbage Collector",
            "Slowly recover HP over time",
            "GC",
            Defense,
            S::HpRegen,
            2.0,
            2,
            true,
        ),
        stat(
            "armor_1",
            "Type Safety",
            "Reduce incoming damage",
            "TS",
            Defense,
            S::Armor,
            0.1,
            2,
            true,
        ),
        stat(
            "lifesteal_1",
            "Memory Recycling",
            "Heal when dealing damage",
            "<>",
            Defense,
            S::Lifesteal,
            0.05,
            2,
            true,
        ),
        stat(
            "pierce_1",
            "Pointer Reference",
            "Attacks pierce through enemies",
            "*p",
            Weapon,
            S::Pierce,
            1.0,
            2,
            true,
        ),
        stat(
            "projectiles_1",
            "Array Spread",
            "Fire additional projectiles",
            "[]",
            Weapon,
            S::Projectiles,
            1.0,
            2,
            true,
        ),
        stat(
            "aoe_1",
            "Broadcast Event",
            "Attacks hit nearby enemies",
            "@",
            Weapon,
            S::AoeRadius,
            30.0,
            2,
            true,
        ),
        // Tier 3
        stat(
            "damage_3",
            "Root Access",
            "Devastating system-level damage",
            "#!",
            Paradigm,
            S::Damage,
            0.5,
            3,
            true,
        ),
        stat(
            "multithreading",
            "Multithreading",
            "Double your attack speed",
            "||",
            Paradigm,
            S::AttackSpeed,
            0.5,
            3,
            false,
        ),
        stat(
            "regen_2",
            "Auto-Scaling",
            "Powerful HP regeneration",
            "K8",
            Defense,
            S::HpRegen,
            5.0,
            3,
            true,
        ),
        stat(
            "armor_2",
            "Firewall",
            "Major damage reduction",
            "|||",
            Defense,
            S::Armor,
            0.2,
            3,
            false,
        ),
        stat(
            "lifesteal_2",
            "Dependency Injection",
            "Strong lifesteal effect",
            "DI",
            Defense,
            S::Lifesteal,
            0.12,
            3,
            false,
        ),
        stat(
            "chain_lightning",
            "Event Propagation",
            "Attacks chain to nearby enemies",
            "~>",
            Weapon,
            S::ChainCount,
            3.0,
            3,
            false,
        ),
        stat(
            "explosion",
            "Stack Overflow",
            "Enemies explode on death",
            "!!!",
            Weapon,
            S::ExplosionDamage,
            0.5,
            3,
            false,
        ),
        stat(
            "critical",
            "Race Condition",
            "Chance for double damage",
            "x2",
            Optimization,
            S::CritChance,
            0.2,
            3,
            true,
        ),
        stat(
            "magnet",
            "Global Scope",
            "Massively increased XP pickup range",
            "$",
            Tooling,
            S::MagnetRange,
            100.0,
            3,
            true,
        ),
        stat(
            "invincibility",
            "Exception Handler",
            "Longer invincibility after damage",
            "!e",
            Defense,
            S::InvincibilityDuration,
            500.0,
            3,
            true,
        ),
    ]
}
