//! Output events for the presentation layer
//!
//! The simulation pushes these during a tick; the presentation drains them
//! afterwards. Nothing in the simulation reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::{EnemyKind, WeaponId};

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Character HP reached 0
    Died,
    /// Presentation ended the run
    Abandoned,
}

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub elapsed_ms: f64,
    pub level: u32,
    pub boss_defeated: bool,
    /// `floor(level * 10 + elapsed_ms / 10000)`
    pub reward: u64,
    pub reason: Option<EndReason>,
}

impl RunSummary {
    pub fn reward_for(level: u32, elapsed_ms: f64) -> u64 {
        (level as f64 * 10.0 + elapsed_ms / 10_000.0).floor() as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted {
        seed: u64,
    },
    EnemySpawned {
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
    },
    EnemyDamaged {
        id: u32,
        amount: f32,
        pos: Vec2,
        crit: bool,
    },
    EnemyKilled {
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
    },
    PickupSpawned {
        id: u32,
        pos: Vec2,
        value: u32,
    },
    PickupCollected {
        id: u32,
        xp: u32,
    },
    CharacterDamaged {
        amount: f32,
        hp: f32,
    },
    CharacterHealed {
        amount: f32,
        hp: f32,
    },
    LeveledUp {
        level: u32,
    },
    WeaponAcquired {
        weapon: WeaponId,
    },
    WeaponLeveled {
        weapon: WeaponId,
        level: u32,
    },
    BossSpawned {
        id: u32,
    },
    BossDefeated,
    OfferOpened {
        entries: Vec<String>,
    },
    OfferClosed {
        chosen: String,
    },
    Paused,
    Resumed,
    RunEnded(RunSummary),
}
