//! Static game data
//!
//! Weapons, upgrades and enemy stats are loaded once, validated, and then
//! shared read-only by a run through [`GameConfig`].

pub mod enemies;
pub mod upgrades;
pub mod weapons;

pub use enemies::{EnemyKind, EnemyStats, EnemyTable};
pub use upgrades::{UpgradeCategory, UpgradeEntry, UpgradeStat, builtin_upgrades};
pub use weapons::{
    Archetype, LevelBonus, WeaponDefinition, WeaponId, WeaponStats, builtin_weapons,
};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Validated weapon, upgrade and enemy data
#[derive(Debug, Clone)]
pub struct Catalog {
    weapons: BTreeMap<WeaponId, Arc<WeaponDefinition>>,
    upgrades: Vec<UpgradeEntry>,
    enemies: EnemyTable,
}

impl Catalog {
    /// Build a catalog, rejecting dangling weapon references and duplicates
    pub fn new(
        weapons: Vec<WeaponDefinition>,
        upgrades: Vec<UpgradeEntry>,
        enemies: EnemyTable,
    ) -> Result<Self, ConfigError> {
        let mut by_id = BTreeMap::new();
        for weapon in weapons {
            weapon.validate()?;
            let id = weapon.id.clone();
            if by_id.insert(id.clone(), Arc::new(weapon)).is_some() {
                return Err(ConfigError::DuplicateWeapon(id));
            }
        }

        let mut seen = HashSet::new();
        for upgrade in &upgrades {
            if !seen.insert(upgrade.id.as_str()) {
                return Err(ConfigError::DuplicateUpgrade(upgrade.id.clone()));
            }
            if !(1..=3).contains(&upgrade.tier) {
                return Err(ConfigError::InvalidTier {
                    id: upgrade.id.clone(),
                    tier: upgrade.tier,
                });
            }
            match (&upgrade.weapon, upgrade.stat) {
                (Some(weapon), _) if !by_id.contains_key(weapon) => {
                    return Err(ConfigError::UpgradeReferencesUnknownWeapon {
                        upgrade: upgrade.id.clone(),
                        weapon: weapon.clone(),
                    });
                }
                (None, UpgradeStat::Weapon) => {
                    return Err(ConfigError::WeaponUpgradeWithoutWeapon(upgrade.id.clone()));
                }
                _ => {}
            }
        }

        Ok(Self {
            weapons: by_id,
            upgrades,
            enemies,
        })
    }

    /// The shipped data
    pub fn builtin() -> Self {
        Self {
            weapons: builtin_weapons()
                .into_iter()
                .map(|w| (w.id.clone(), Arc::new(w)))
                .collect(),
            upgrades: builtin_upgrades(),
            enemies: EnemyTable::default(),
        }
    }

    /// Look up a weapon; unknown ids are a catalog bug
    pub fn weapon(&self, id: &WeaponId) -> Result<&Arc<WeaponDefinition>, ConfigError> {
        self.weapons
            .get(id)
            .ok_or_else(|| ConfigError::UnknownWeapon(id.clone()))
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Arc<WeaponDefinition>> {
        self.weapons.values()
    }

    pub fn upgrades(&self) -> &[UpgradeEntry] {
        &self.upgrades
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeEntry> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn enemies(&self) -> &EnemyTable {
        &self.enemies
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct CatalogDocument {
    weapons: Vec<WeaponDefinition>,
    upgrades: Vec<UpgradeEntry>,
    enemies: EnemyTable,
}

impl Default for CatalogDocument {
    fn default() -> Self {
        Self {
            weapons: builtin_weapons(),
            upgrades: builtin_upgrades(),
            enemies: EnemyTable::default(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigDocument {
    tuning: Tuning,
    catalog: CatalogDocument,
}

/// Everything a run reads but never writes
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub catalog: Catalog,
}

impl GameConfig {
    pub fn new(tuning: Tuning, catalog: Catalog) -> Result<Self, ConfigError> {
        tuning.validate()?;
        catalog.weapon(&WeaponId::new(tuning.player.starting_weapon.as_str()))?;
        Ok(Self { tuning, catalog })
    }

    /// Load a config document shaped like
    /// `{ "tuning": {...}, "catalog": { "weapons": [...], "upgrades": [...], "enemies": {...} } }`.
    /// Every section is optional and falls back to the shipped data.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let doc: ConfigDocument = serde_json::from_str(json)?;
        let catalog = Catalog::new(
            doc.catalog.weapons,
            doc.catalog.upgrades,
            doc.catalog.enemies,
        )?;
        Self::new(doc.tuning, catalog)
    }

    /// Shared handle for a run
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
