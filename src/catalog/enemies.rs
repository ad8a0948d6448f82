//! Enemy stat tables

use serde::{Deserialize, Serialize};

/// Enemy type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    NullPointer,
    RaceCondition,
    MemoryLeak,
    /// "Infinite Loop", the one-shot boss
    Boss,
}

impl EnemyKind {
    /// Regular kinds ordered weakest first
    pub const REGULAR: [EnemyKind; 3] = [
        EnemyKind::NullPointer,
        EnemyKind::RaceCondition,
        EnemyKind::MemoryLeak,
    ];

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }
}

/// Base stats of one enemy kind (before time scaling)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub name: String,
    pub hp: f32,
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub radius: f32,
}

impl EnemyStats {
    fn new(name: &str, hp: f32, damage: f32, speed: f32, xp_value: u32, radius: f32) -> Self {
        Self {
            name: name.into(),
            hp,
            damage,
            speed,
            xp_value,
            radius,
        }
    }
}

/// Stats for every enemy kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTable {
    pub null_pointer: EnemyStats,
    pub race_condition: EnemyStats,
    pub memory_leak: EnemyStats,
    pub boss: EnemyStats,
}

impl Default for EnemyTable {
    fn default() -> Self {
        Self {
            null_pointer: EnemyStats::new("Null Pointer", 12.0, 5.0, 50.0, 1, 12.0),
            race_condition: EnemyStats::new("Race Condition", 6.0, 3.0, 120.0, 2, 8.0),
            memory_leak: EnemyStats::new("Memory Leak", 50.0, 8.0, 35.0, 5, 20.0),
            boss: EnemyStats::new("Infinite Loop", 500.0, 25.0, 50.0, 50, 48.0),
        }
    }
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::NullPointer => &self.null_pointer,
            EnemyKind::RaceCondition => &self.race_condition,
            EnemyKind::MemoryLeak => &self.memory_leak,
            EnemyKind::Boss => &self.boss,
        }
    }
}
