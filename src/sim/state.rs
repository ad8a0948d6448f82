//! Run state and the commands the presentation layer may issue
//!
//! One [`GameState`] is one run. It is created by [`GameState::new`], advanced
//! by [`crate::sim::tick`], and read (never written) by the presentation.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::enemy::{Enemy, hp_multiplier};
use super::event::{EndReason, GameEvent, RunSummary};
use super::pickup::XpPickup;
use super::spawn::SpawnDirector;
use super::upgrade::{UpgradeOffer, apply_upgrade, grant_weapon, roll_offer};
use crate::catalog::{EnemyKind, GameConfig, WeaponId};
use crate::error::{CommandError, ConfigError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Playing,
    /// Presentation paused the run
    Paused,
    /// Waiting for an upgrade choice
    LevelUp,
    Ended(EndReason),
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub config: Arc<GameConfig>,
    pub phase: RunPhase,
    /// Simulated time while playing (ms)
    pub elapsed_ms: f64,
    pub character: Character,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Uncollected pickups in drop order
    pub pickups: Vec<XpPickup>,
    pub spawner: SpawnDirector,
    pub boss_spawned: bool,
    pub boss_defeated: bool,
    /// Open level-up offer
    pub offer: Option<UpgradeOffer>,
    /// Events since the last [`GameState::drain_events`]
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Start a run: full HP, level 1, the starting weapon, no enemies
    pub fn new(config: Arc<GameConfig>, seed: u64) -> Result<Self, ConfigError> {
        let tuning = &config.tuning;
        let mut character = Character::new(&tuning.player, &tuning.world);
        grant_weapon(
            &mut character,
            &WeaponId::new(tuning.player.starting_weapon.as_str()),
            &config.catalog,
        )?;
        let spawner = SpawnDirector::new(&tuning.spawning);

        log::info!("run started (seed {seed:#x})");
        Ok(Self {
            seed,
            phase: RunPhase::Playing,
            elapsed_ms: 0.0,
            character,
            enemies: Vec::new(),
            pickups: Vec::new(),
            spawner,
            boss_spawned: false,
            boss_defeated: false,
            offer: None,
            events: vec![GameEvent::RunStarted { seed }],
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            config,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, RunPhase::Ended(_))
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            RunPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            elapsed_ms: self.elapsed_ms,
            level: self.character.level,
            boss_defeated: self.boss_defeated,
            reward: RunSummary::reward_for(self.character.level, self.elapsed_ms),
            reason: self.end_reason(),
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            RunPhase::Playing => self.set_paused(true),
            RunPhase::Paused => self.set_paused(false),
            _ => {}
        }
    }

    /// Pause or resume. Ignored during a level-up offer or after the run ended.
    pub fn set_paused(&mut self, paused: bool) {
        match (self.phase, paused) {
            (RunPhase::Playing, true) => {
                self.phase = RunPhase::Paused;
                self.events.push(GameEvent::Paused);
            }
            (RunPhase::Paused, false) => {
                self.phase = RunPhase::Playing;
                self.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    /// Abandon the run. No-op if it already ended.
    pub fn end_run(&mut self) {
        self.finish(EndReason::Abandoned);
    }

    pub(crate) fn finish(&mut self, reason: EndReason) {
        if self.is_ended() {
            return;
        }
        self.phase = RunPhase::Ended(reason);
        self.offer = None;
        let summary = self.summary();
        log::info!(
            "run ended ({reason:?}) at level {} after {:.1}s, reward {}",
            summary.level,
            summary.elapsed_ms / 1000.0,
            summary.reward
        );
        self.events.push(GameEvent::RunEnded(summary));
    }

    /// Spend one level's worth of XP if possible and open an offer for it
    pub(crate) fn check_level_up(&mut self) {
        if self.offer.is_some() || !self.character.try_level_up(&self.config.tuning.progression) {
            return;
        }
        let level = self.character.level;
        log::info!("reached level {level}");
        self.events.push(GameEvent::LeveledUp { level });

        let offer = roll_offer(
            &self.config.catalog,
            &self.character,
            &self.config.tuning.offer,
            &mut self.rng,
        );
        if offer.entries.is_empty() {
            log::warn!("no upgrades eligible at level {level}");
            return;
        }
        self.events.push(GameEvent::OfferOpened {
            entries: offer.ids(),
        });
        self.offer = Some(offer);
        self.phase = RunPhase::LevelUp;
    }

    /// Apply one entry of the open offer and resume play
    pub fn choose_upgrade(&mut self, id: &str) -> Result<(), CommandError> {
        let result = self.apply_choice(id);
        if let Err(err) = &result {
            log::warn!("rejected upgrade choice `{id}`: {err}");
        }
        result
    }

    fn apply_choice(&mut self, id: &str) -> Result<(), CommandError> {
        if self.is_ended() {
            return Err(CommandError::RunEnded);
        }
        let offer = self.offer.as_ref().ok_or(CommandError::NoOfferOpen)?;
        let entry = offer
            .get(id)
            .cloned()
            .ok_or_else(|| CommandError::NotOffered(id.to_string()))?;

        let config = Arc::clone(&self.config);
        let events = apply_upgrade(
            &mut self.character,
            &entry,
            &config.catalog,
            &config.tuning.player,
        )?;
        log::info!("chose upgrade {}", entry.id);
        self.events.extend(events);
        self.events.push(GameEvent::OfferClosed { chosen: entry.id });
        self.offer = None;
        self.phase = RunPhase::Playing;
        Ok(())
    }

    /// Place an enemy of `kind` at `pos`, scaled for the current time
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let spawning = &self.config.tuning.spawning;
        let hp_mult = hp_multiplier(self.elapsed_ms, spawning);
        let stats = self.config.catalog.enemies().get(kind);
        self.enemies
            .push(Enemy::spawn(id, kind, pos, stats, hp_mult, spawning));
        log::debug!("spawned {kind:?} #{id} at ({:.0}, {:.0})", pos.x, pos.y);
        self.events.push(GameEvent::EnemySpawned { id, kind, pos });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::weapons::INTERPRETER_BEAM;
    use crate::sim::test_support::session;

    #[test]
    fn test_new_run() {
        let mut state = GameState::new(GameConfig::default().shared(), 42).unwrap();
        assert_eq!(state.phase, RunPhase::Playing);
        assert_eq!(state.character.level, 1);
        assert_eq!(state.character.current_hp, 100.0);
        assert_eq!(state.character.weapons.len(), 1);
        assert_eq!(state.character.weapons[0].id().as_str(), INTERPRETER_BEAM);
        assert!(state.enemies.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::RunStarted { seed: 42 }]);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = session();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_choose_without_offer() {
        let mut state = session();
        assert!(matches!(
            state.choose_upgrade("damage_1"),
            Err(CommandError::NoOfferOpen)
        ));
    }

    #[test]
    fn test_choose_not_offered() {
        let mut state = session();
        state.character.current_xp = 8;
        state.check_level_up();
        assert_eq!(state.phase, RunPhase::LevelUp);
        let offered = state.offer.as_ref().unwrap().ids();
        let missing = state
            .config
            .catalog
            .upgrades()
            .iter()
            .map(|u| u.id.clone())
            .find(|id| !offered.contains(id))
            .unwrap();
        assert!(matches!(
            state.choose_upgrade(&missing),
            Err(CommandError::NotOffered(_))
        ));
        assert_eq!(state.phase, RunPhase::LevelUp);

        state.choose_upgrade(&offered[0]).unwrap();
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.offer.is_none());
        assert_eq!(state.character.taken_upgrades, vec![offered[0].clone()]);
    }

    #[test]
    fn test_pause_is_ignored_during_offer_and_after_end() {
        let mut state = session();
        state.toggle_pause();
        assert_eq!(state.phase, RunPhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, RunPhase::Playing);

        state.character.current_xp = 8;
        state.check_level_up();
        state.set_paused(true);
        assert_eq!(state.phase, RunPhase::LevelUp);

        state.end_run();
        assert_eq!(state.end_reason(), Some(EndReason::Abandoned));
        state.set_paused(false);
        assert_eq!(state.end_reason(), Some(EndReason::Abandoned));
        assert!(matches!(
            state.choose_upgrade("damage_1"),
            Err(CommandError::RunEnded)
        ));
    }

    #[test]
    fn test_end_run_emits_once() {
        let mut state = session();
        state.end_run();
        state.end_run();
        let ended = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::RunEnded(_)))
            .count();
        assert_eq!(ended, 1);
    }
}
