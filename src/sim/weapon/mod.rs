//! Owned weapons
//!
//! A [`WeaponInstance`] pairs a shared definition with a level, a cooldown
//! timer and archetype-specific state. Discrete weapons fire once their
//! cooldown reaches the attack interval; continuous ones (attack speed 0)
//! act every tick through [`Attack::advance`].

mod beam;
mod burst;
mod chain;
mod orbit;
mod spread;

pub use beam::Beam;
pub use burst::Burst;
pub use chain::Chain;
pub use orbit::{Orbit, Orbital};
pub use spread::{Bolt, Spread};

use std::sync::Arc;

use serde::Serialize;

use super::character::StatTable;
use super::state::GameState;
use crate::catalog::{Archetype, WeaponDefinition, WeaponId, WeaponStats};

/// Per-tick numbers for a weapon after character multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loadout {
    /// Level stats before multipliers
    pub stats: WeaponStats,
    pub damage: f32,
    /// ms between attacks; infinite when attack speed is 0
    pub interval_ms: f32,
    pub range: f32,
}

impl Loadout {
    pub fn new(stats: WeaponStats, character: &StatTable) -> Self {
        let attack_speed = stats.attack_speed * character.attack_speed_multiplier;
        Self {
            stats,
            damage: stats.damage * character.damage_multiplier,
            interval_ms: if attack_speed > 0.0 {
                1000.0 / attack_speed
            } else {
                f32::INFINITY
            },
            range: stats.range * character.range_multiplier,
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.stats.attack_speed <= 0.0
    }
}

/// Archetype behavior
pub trait Attack {
    /// One discrete attack
    fn fire(&mut self, state: &mut GameState, loadout: &Loadout);

    /// Runs every tick, after any discrete attack
    fn advance(&mut self, _state: &mut GameState, _loadout: &Loadout, _dt_ms: f32) {}

    /// The weapon gained a level
    fn level_changed(&mut self, _stats: &WeaponStats) {}
}

#[derive(Debug, Clone, Serialize)]
pub enum Behavior {
    Beam(Beam),
    Burst(Burst),
    Orbit(Orbit),
    Spread(Spread),
    Chain(Chain),
}

impl Behavior {
    fn for_archetype(archetype: Archetype, stats: &WeaponStats) -> Self {
        match archetype {
            Archetype::Beam => Behavior::Beam(Beam),
            Archetype::Aoe => Behavior::Burst(Burst),
            Archetype::Orbit => Behavior::Orbit(Orbit::new(stats.orbit_count)),
            Archetype::Projectile => Behavior::Spread(Spread::default()),
            Archetype::Chain => Behavior::Chain(Chain),
        }
    }

    fn as_attack(&mut self) -> &mut dyn Attack {
        match self {
            Behavior::Beam(b) => b,
            Behavior::Burst(b) => b,
            Behavior::Orbit(o) => o,
            Behavior::Spread(s) => s,
            Behavior::Chain(c) => c,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeaponInstance {
    definition: Arc<WeaponDefinition>,
    level: u32,
    /// ms accumulated toward the next attack
    cooldown_ms: f32,
    pub behavior: Behavior,
}

impl WeaponInstance {
    pub fn new(definition: Arc<WeaponDefinition>) -> Self {
        let behavior = Behavior::for_archetype(definition.archetype, &definition.stats_at(1));
        Self {
            definition,
            level: 1,
            cooldown_ms: 0.0,
            behavior,
        }
    }

    pub fn id(&self) -> &WeaponId {
        &self.definition.id
    }

    pub fn definition(&self) -> &WeaponDefinition {
        &self.definition
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.definition.max_level
    }

    pub fn stats(&self) -> WeaponStats {
        self.definition.stats_at(self.level)
    }

    pub fn loadout(&self, character: &StatTable) -> Loadout {
        Loadout::new(self.stats(), character)
    }

    /// Gain a level; false (and no change) at max level
    pub fn level_up(&mut self) -> bool {
        if self.is_max_level() {
            return false;
        }
        self.level += 1;
        let stats = self.stats();
        self.behavior.as_attack().level_changed(&stats);
        true
    }

    /// Advance by `dt_ms`, attacking when the cooldown allows. The weapon
    /// must not be stored in `state.character.weapons` while this runs.
    pub fn update(&mut self, state: &mut GameState, dt_ms: f32) {
        let loadout = self.loadout(&state.character.stats);
        let attack = self.behavior.as_attack();

        if !loadout.is_continuous() {
            self.cooldown_ms += dt_ms;
            if self.cooldown_ms >= loadout.interval_ms {
                self.cooldown_ms = 0.0;
                attack.fire(state, &loadout);
            }
        }
        attack.advance(state, &loadout, dt_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::weapons::{GARBAGE_COLLECTOR, INTERPRETER_BEAM};
    use crate::catalog::{Catalog, EnemyKind};
    use crate::sim::test_support::{place_enemy, session};
    use glam::Vec2;

    fn instance(id: &str) -> WeaponInstance {
        let catalog = Catalog::builtin();
        WeaponInstance::new(Arc::clone(catalog.weapon(&id.into()).unwrap()))
    }

    #[test]
    fn test_loadout_applies_multipliers() {
        let beam = instance(INTERPRETER_BEAM);
        let mut stats = StatTable::new(1.1);
        stats.damage_multiplier = 1.5;
        stats.attack_speed_multiplier = 2.0;
        stats.range_multiplier = 1.15;
        let loadout = beam.loadout(&stats);
        assert_eq!(loadout.damage, 12.0);
        assert!((loadout.interval_ms - 1000.0 / 12.0).abs() < 1e-3);
        assert!((loadout.range - 172.5).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_is_continuous() {
        let gc = instance(GARBAGE_COLLECTOR);
        let loadout = gc.loadout(&StatTable::new(1.0));
        assert!(loadout.is_continuous());
        assert!(loadout.interval_ms.is_infinite());
    }

    #[test]
    fn test_level_up_stops_at_max() {
        let mut beam = instance(INTERPRETER_BEAM);
        assert!(beam.level_up());
        assert_eq!(beam.level(), 2);
        while beam.level_up() {}
        assert_eq!(beam.level(), 5);
        assert!(beam.is_max_level());
        assert!(!beam.level_up());
    }

    #[test]
    fn test_fires_once_per_interval() {
        let mut state = session();
        let pos = state.character.pos + Vec2::new(100.0, 0.0);
        let id = place_enemy(&mut state, EnemyKind::MemoryLeak, pos);
        let mut beam = instance(INTERPRETER_BEAM);

        // 6 attacks/s -> 166.7ms interval
        beam.update(&mut state, 100.0);
        assert_eq!(state.enemy(id).unwrap().current_hp, 50.0);
        beam.update(&mut state, 100.0);
        assert_eq!(state.enemy(id).unwrap().current_hp, 42.0);
        beam.update(&mut state, 100.0);
        assert_eq!(state.enemy(id).unwrap().current_hp, 42.0);
    }
}
