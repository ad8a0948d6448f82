//! Level-up offers and upgrade application
//!
//! Offers are drawn without replacement from a weighted pool: each eligible
//! entry appears `weight` times, the pool is shuffled uniformly and the first
//! distinct entries win.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::character::{Acquisition, Character};
use super::event::GameEvent;
use crate::catalog::{Catalog, UpgradeEntry, WeaponId};
use crate::error::ConfigError;
use crate::tuning::{OfferTuning, PlayerTuning};

/// The entries shown for one level-up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeOffer {
    pub entries: Vec<UpgradeEntry>,
}

impl UpgradeOffer {
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&UpgradeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

fn tier_unlocked(tier: u8, level: u32, tuning: &OfferTuning) -> bool {
    match tier {
        1 => true,
        2 => level >= tuning.tier2_level,
        3 => level >= tuning.tier3_level,
        _ => false,
    }
}

/// Whether `entry` may appear in an offer for `character`
pub fn is_eligible(entry: &UpgradeEntry, character: &Character, tuning: &OfferTuning) -> bool {
    if !tier_unlocked(entry.tier, character.level, tuning) {
        return false;
    }
    match &entry.weapon {
        Some(weapon) => character.weapon(weapon).is_none_or(|w| !w.is_max_level()),
        None => true,
    }
}

/// Selection weight; higher tiers get favored as the character levels
pub fn weight(entry: &UpgradeEntry, character: &Character) -> usize {
    let level = character.level;
    let base = match entry.tier {
        3 if level >= 12 => 3,
        2 if level >= 8 => 2,
        1 if level <= 5 => 2,
        _ => 1,
    };
    let owned = entry
        .weapon
        .as_ref()
        .is_some_and(|id| character.has_weapon(id));
    if owned { base + 2 } else { base }
}

/// Draw up to `offer_size` distinct eligible entries
pub fn roll_offer(
    catalog: &Catalog,
    character: &Character,
    tuning: &OfferTuning,
    rng: &mut Pcg32,
) -> UpgradeOffer {
    let mut pool: Vec<&UpgradeEntry> = Vec::new();
    for entry in catalog.upgrades() {
        if is_eligible(entry, character, tuning) {
            let w = weight(entry, character);
            pool.extend(std::iter::repeat_n(entry, w));
        }
    }
    pool.shuffle(rng);

    let mut entries: Vec<UpgradeEntry> = Vec::with_capacity(tuning.offer_size);
    for entry in pool {
        if entries.len() >= tuning.offer_size {
            break;
        }
        if !entries.iter().any(|e| e.id == entry.id) {
            entries.push(entry.clone());
        }
    }
    UpgradeOffer { entries }
}

/// Apply a chosen entry to the character, returning the events it caused
pub fn apply_upgrade(
    character: &mut Character,
    entry: &UpgradeEntry,
    catalog: &Catalog,
    tuning: &PlayerTuning,
) -> Result<Vec<GameEvent>, ConfigError> {
    let mut events = Vec::new();
    match &entry.weapon {
        Some(id) => {
            let definition = catalog.weapon(id)?;
            match character.acquire_weapon(definition) {
                Acquisition::Acquired => {
                    log::info!("acquired weapon {id}");
                    events.push(GameEvent::WeaponAcquired { weapon: id.clone() });
                }
                Acquisition::Leveled(level) => {
                    log::info!("{id} reached level {level}");
                    events.push(GameEvent::WeaponLeveled {
                        weapon: id.clone(),
                        level,
                    });
                }
                Acquisition::AlreadyMax => log::debug!("{id} already at max level"),
            }
        }
        None => character.apply_stat(entry.stat, entry.value, tuning),
    }
    character.taken_upgrades.push(entry.id.clone());
    Ok(events)
}

/// Grant a weapon outside of an offer (run start)
pub fn grant_weapon(
    character: &mut Character,
    id: &WeaponId,
    catalog: &Catalog,
) -> Result<Acquisition, ConfigError> {
    Ok(character.acquire_weapon(catalog.weapon(id)?))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;

    use super::*;
    use crate::catalog::weapons::{INTERPRETER_BEAM, SEGFAULT};
    use crate::tuning::Tuning;

    fn setup() -> (Character, Catalog, Tuning) {
        let tuning = Tuning::default();
        let catalog = Catalog::builtin();
        let mut character = Character::new(&tuning.player, &tuning.world);
        grant_weapon(&mut character, &INTERPRETER_BEAM.into(), &catalog).unwrap();
        (character, catalog, tuning)
    }

    #[test]
    fn test_low_level_offers_are_tier_one() {
        let (character, catalog, tuning) = setup();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let offer = roll_offer(&catalog, &character, &tuning.offer, &mut rng);
            assert_eq!(offer.entries.len(), 3);
            let ids: HashSet<&str> = offer.entries.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids.len(), 3);
            assert!(offer.entries.iter().all(|e| e.tier == 1));
        }
    }

    #[test]
    fn test_tier_gates() {
        let (mut character, catalog, tuning) = setup();
        let tier = |c: &Character, t: u8| {
            catalog
                .upgrades()
                .iter()
                .filter(|e| e.tier == t)
                .any(|e| is_eligible(e, c, &tuning.offer))
        };
        character.level = 5;
        assert!(!tier(&character, 2));
        character.level = 6;
        assert!(tier(&character, 2));
        assert!(!tier(&character, 3));
        character.level = 10;
        assert!(tier(&character, 3));
    }

    #[test]
    fn test_maxed_weapon_is_excluded() {
        let (mut character, catalog, tuning) = setup();
        let grant = catalog.upgrade("weapon_segfault").unwrap().clone();
        for _ in 0..5 {
            apply_upgrade(&mut character, &grant, &catalog, &tuning.player).unwrap();
        }
        assert_eq!(character.weapon_level(&SEGFAULT.into()), 5);
        assert!(!is_eligible(&grant, &character, &tuning.offer));

        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..100 {
            let offer = roll_offer(&catalog, &character, &tuning.offer, &mut rng);
            assert!(offer.get("weapon_segfault").is_none());
        }
    }

    #[test]
    fn test_taken_upgrade_stays_eligible() {
        let (mut character, catalog, tuning) = setup();
        character.level = 12;
        let explosion = catalog.upgrade("explosion").unwrap().clone();
        let firewall = catalog.upgrade("armor_2").unwrap().clone();
        apply_upgrade(&mut character, &explosion, &catalog, &tuning.player).unwrap();
        apply_upgrade(&mut character, &firewall, &catalog, &tuning.player).unwrap();
        assert!(is_eligible(&explosion, &character, &tuning.offer));
        assert!(is_eligible(&firewall, &character, &tuning.offer));
        assert!((character.stats.armor - 0.2).abs() < 1e-6);

        let mut rng = Pcg32::seed_from_u64(3);
        let offered_again = (0..2000).any(|_| {
            roll_offer(&catalog, &character, &tuning.offer, &mut rng)
                .get("explosion")
                .is_some()
        });
        assert!(offered_again);
    }

    #[test]
    fn test_weights() {
        let (mut character, catalog, _) = setup();
        let hp = catalog.upgrade("hp_1").unwrap();
        let seg = catalog.upgrade("weapon_segfault").unwrap();
        let root = catalog.upgrade("damage_3").unwrap();
        assert_eq!(weight(hp, &character), 2);
        character.level = 12;
        assert_eq!(weight(hp, &character), 1);
        assert_eq!(weight(root, &character), 3);
        grant_weapon(&mut character, &SEGFAULT.into(), &catalog).unwrap();
        assert_eq!(weight(seg, &character), 3);
    }

    #[test]
    fn test_weapon_grant_events() {
        let (mut character, catalog, tuning) = setup();
        let grant = catalog.upgrade("weapon_segfault").unwrap().clone();
        let events = apply_upgrade(&mut character, &grant, &catalog, &tuning.player).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::WeaponAcquired {
                weapon: SEGFAULT.into()
            }]
        );
        let events = apply_upgrade(&mut character, &grant, &catalog, &tuning.player).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::WeaponLeveled {
                weapon: SEGFAULT.into(),
                level: 2
            }]
        );
    }

    #[test]
    fn test_small_pool_gives_short_offer() {
        let tuning = Tuning::default();
        let mut upgrades = crate::catalog::builtin_upgrades();
        upgrades.retain(|u| u.id == "damage_1" || u.id == "speed_1");
        let catalog = Catalog::new(
            crate::catalog::builtin_weapons(),
            upgrades,
            crate::catalog::EnemyTable::default(),
        )
        .unwrap();
        let character = Character::new(&tuning.player, &tuning.world);
        let mut rng = Pcg32::seed_from_u64(5);
        let offer = roll_offer(&catalog, &character, &tuning.offer, &mut rng);
        assert_eq!(offer.entries.len(), 2);
    }
}
