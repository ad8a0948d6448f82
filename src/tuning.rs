//! Game balance tuning
//!
//! Every numeric knob of the simulation lives here. Defaults reproduce the
//! shipped balance; a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Player character base values
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub base_hp: f32,
    /// Movement speed in units/second before `speed_multiplier`
    pub base_speed: f32,
    pub collision_radius: f32,
    /// Invincibility after taking a hit (ms)
    pub invincibility_ms: f32,
    /// Starting XP multiplier (class bonus)
    pub xp_multiplier: f32,
    /// Regen heals `hp_regen` once per this many ms
    pub regen_interval_ms: f32,
    /// Damage after armor never drops below this
    pub min_contact_damage: f32,
    pub armor_cap: f32,
    pub crit_cap: f32,
    /// Weapon granted at run start
    pub starting_weapon: String,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            base_hp: 100.0,
            base_speed: 180.0,
            collision_radius: 16.0,
            invincibility_ms: 1000.0,
            xp_multiplier: 1.1,
            regen_interval_ms: 1000.0,
            min_contact_damage: 1.0,
            armor_cap: 0.8,
            crit_cap: 0.8,
            starting_weapon: "INTERPRETER_BEAM".to_string(),
        }
    }
}

/// Arena bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub width: f32,
    pub height: f32,
    /// Spawn positions are kept this far inside the bounds
    pub spawn_margin: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            spawn_margin: 50.0,
        }
    }
}

/// Spawn cadence and difficulty ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// ms between spawn events at minute 0
    pub initial_spawn_rate_ms: f32,
    pub min_spawn_rate_ms: f32,
    /// Interval shrink per elapsed minute (ms)
    pub rate_decrease_per_minute: f32,
    pub spawn_distance: f32,
    /// Live enemy cap; spawn events are skipped at the cap
    pub max_enemies: usize,
    pub initial_per_spawn: f32,
    pub per_spawn_increase_per_minute: f32,
    pub max_per_spawn: f32,
    pub hp_scale_per_minute: f32,
    pub max_hp_scale: f32,
    /// Bosses only take this share of the HP scaling excess
    pub boss_hp_scale_share: f32,
    /// Share of the HP scaling excess turned into bonus XP
    pub xp_bonus_share: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            initial_spawn_rate_ms: 2500.0,
            min_spawn_rate_ms: 600.0,
            rate_decrease_per_minute: 1200.0,
            spawn_distance: 350.0,
            max_enemies: 200,
            initial_per_spawn: 1.0,
            per_spawn_increase_per_minute: 3.0,
            max_per_spawn: 4.0,
            hp_scale_per_minute: 0.08,
            max_hp_scale: 2.5,
            boss_hp_scale_share: 0.5,
            xp_bonus_share: 0.5,
        }
    }
}

/// XP curve and pickup behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub base_xp: f32,
    /// Per-level growth of the XP threshold (must be > 1)
    pub xp_scaling: f32,
    /// Pickups within this distance are collected
    pub pickup_radius: f32,
    pub base_magnet_radius: f32,
    /// Attracted pickup speed (units/second)
    pub pickup_speed: f32,
    /// Initial drift speed range of a dropped pickup
    pub drift_speed_min: f32,
    pub drift_speed_max: f32,
    /// Drift deceleration (units/second²)
    pub drift_drag: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            base_xp: 8.0,
            xp_scaling: 1.25,
            pickup_radius: 60.0,
            base_magnet_radius: 150.0,
            pickup_speed: 350.0,
            drift_speed_min: 40.0,
            drift_speed_max: 100.0,
            drift_drag: 200.0,
        }
    }
}

/// One-shot boss encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Elapsed run time at which the boss appears (ms)
    pub spawn_at_ms: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            spawn_at_ms: 180_000.0,
        }
    }
}

/// Shared combat resolution constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub crit_multiplier: f32,
    /// Half-width of the beam pierce cone (radians)
    pub pierce_half_angle: f32,
    /// Max hop distance for chains
    pub chain_radius: f32,
    /// Damage factor for every beam target after the first
    pub beam_follow_up_factor: f32,
    /// Damage factor for beam splash
    pub splash_factor: f32,
    pub explosion_radius: f32,
    /// Push applied to an enemy on every hit
    pub hit_knockback: f32,
    /// Burst knockback is `knockback * knockback_scale` units
    pub knockback_scale: f32,
    pub orbit_angular_speed: f32,
    pub orbit_hit_cooldown_ms: f32,
    pub orbit_contact_radius: f32,
    pub bolt_hit_radius: f32,
    /// Fan angle added per extra projectile
    pub fan_step: f32,
    /// Total fan width cap (radians)
    pub fan_max: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            crit_multiplier: 2.0,
            pierce_half_angle: 0.3,
            chain_radius: 150.0,
            beam_follow_up_factor: 0.7,
            splash_factor: 0.5,
            explosion_radius: 50.0,
            hit_knockback: 5.0,
            knockback_scale: 0.1,
            orbit_angular_speed: 2.0,
            orbit_hit_cooldown_ms: 500.0,
            orbit_contact_radius: 20.0,
            bolt_hit_radius: 15.0,
            fan_step: 0.15,
            fan_max: std::f32::consts::FRAC_PI_3,
        }
    }
}

/// Upgrade offer gating
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OfferTuning {
    pub offer_size: usize,
    pub tier2_level: u32,
    pub tier3_level: u32,
}

impl Default for OfferTuning {
    fn default() -> Self {
        Self {
            offer_size: 3,
            tier2_level: 6,
            tier3_level: 10,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub world: WorldTuning,
    pub spawning: SpawnTuning,
    pub progression: ProgressionTuning,
    pub boss: BossTuning,
    pub combat: CombatTuning,
    pub offer: OfferTuning,
}

impl Tuning {
    /// Parse a (partial) tuning document; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the curves
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::InvalidTuning { name, value })
            }
        }

        positive("player.base_hp", self.player.base_hp)?;
        positive("player.regen_interval_ms", self.player.regen_interval_ms)?;
        positive("world.width", self.world.width)?;
        positive("world.height", self.world.height)?;
        positive("spawning.min_spawn_rate_ms", self.spawning.min_spawn_rate_ms)?;
        positive("progression.base_xp", self.progression.base_xp)?;
        if !(self.progression.xp_scaling > 1.0) {
            return Err(ConfigError::InvalidTuning {
                name: "progression.xp_scaling",
                value: self.progression.xp_scaling,
            });
        }
        for (name, cap) in [
            ("player.armor_cap", self.player.armor_cap),
            ("player.crit_cap", self.player.crit_cap),
        ] {
            if !(0.0..=1.0).contains(&cap) {
                return Err(ConfigError::InvalidTuning { name, value: cap });
            }
        }
        if self.world.spawn_margin * 2.0 >= self.world.width.min(self.world.height) {
            return Err(ConfigError::InvalidTuning {
                name: "world.spawn_margin",
                value: self.world.spawn_margin,
            });
        }
        Ok(())
    }
}
