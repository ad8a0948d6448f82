//! Error types
//!
//! Configuration problems are catalog bugs and surface once, when the config
//! is built. Runtime numeric edge cases are clamped inside the simulation and
//! never show up here.

use thiserror::Error;

use crate::catalog::WeaponId;

/// Problems found while loading or validating a [`crate::GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown weapon `{0}`")]
    UnknownWeapon(WeaponId),

    #[error("upgrade `{upgrade}` grants unknown weapon `{weapon}`")]
    UpgradeReferencesUnknownWeapon { upgrade: String, weapon: WeaponId },

    #[error("upgrade `{0}` uses the weapon stat but names no weapon")]
    WeaponUpgradeWithoutWeapon(String),

    #[error("duplicate weapon id `{0}`")]
    DuplicateWeapon(WeaponId),

    #[error("duplicate upgrade id `{0}`")]
    DuplicateUpgrade(String),

    #[error("upgrade `{id}` has tier {tier}, expected 1, 2 or 3")]
    InvalidTier { id: String, tier: u8 },

    #[error("weapon `{id}` has max level {max_level} but {bonuses} level bonuses")]
    LevelBonusMismatch {
        id: WeaponId,
        max_level: u32,
        bonuses: usize,
    },

    #[error("weapon `{id}` has a negative level bonus for level {level}")]
    NegativeLevelBonus { id: WeaponId, level: u32 },

    #[error("tuning value `{name}` is out of range: {value}")]
    InvalidTuning { name: &'static str, value: f32 },
}

/// Commands from the presentation layer that the session refused
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("no upgrade offer is open")]
    NoOfferOpen,

    #[error("upgrade `{0}` is not part of the open offer")]
    NotOffered(String),

    #[error("the run has already ended")]
    RunEnded,

    #[error(transparent)]
    Config(#[from] ConfigError),
}
