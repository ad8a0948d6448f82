//! Enemy spawning: time-driven cadence and the one-shot boss

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::enemy::select_kind;
use super::event::GameEvent;
use super::state::GameState;
use crate::catalog::EnemyKind;
use crate::consts::MS_PER_MINUTE;
use crate::polar_to_cartesian;
use crate::tuning::{SpawnTuning, WorldTuning};

/// Spawn cadence, recomputed from elapsed time every tick
#[derive(Debug, Clone, Serialize)]
pub struct SpawnDirector {
    /// ms accumulated toward the next spawn event
    timer_ms: f32,
    interval_ms: f32,
    per_spawn: f32,
}

impl SpawnDirector {
    pub fn new(tuning: &SpawnTuning) -> Self {
        Self {
            timer_ms: 0.0,
            interval_ms: tuning.initial_spawn_rate_ms,
            per_spawn: tuning.initial_per_spawn,
        }
    }

    pub fn interval_ms(&self) -> f32 {
        self.interval_ms
    }

    /// Enemies per spawn event, before flooring
    pub fn per_spawn(&self) -> f32 {
        self.per_spawn
    }

    pub fn update_difficulty(&mut self, elapsed_ms: f64, tuning: &SpawnTuning) {
        let minutes = (elapsed_ms / MS_PER_MINUTE) as f32;
        self.interval_ms = (tuning.initial_spawn_rate_ms
            - minutes * tuning.rate_decrease_per_minute)
            .max(tuning.min_spawn_rate_ms);
        self.per_spawn = (tuning.initial_per_spawn
            + minutes * tuning.per_spawn_increase_per_minute)
            .min(tuning.max_per_spawn);
    }

    /// Advance the timer; returns how many enemies to spawn this tick. A
    /// spawn event at the live cap is skipped entirely.
    pub fn advance(&mut self, dt_ms: f32, live: usize, tuning: &SpawnTuning) -> usize {
        self.timer_ms += dt_ms;
        if self.timer_ms < self.interval_ms {
            return 0;
        }
        self.timer_ms = 0.0;
        if live >= tuning.max_enemies {
            return 0;
        }
        self.per_spawn.floor().max(0.0) as usize
    }
}

/// Point `distance` from `center` at `angle`, pulled inside the world margin
pub fn spawn_position(center: Vec2, angle: f32, distance: f32, world: &WorldTuning) -> Vec2 {
    let pos = center + polar_to_cartesian(distance, angle);
    pos.clamp(
        Vec2::splat(world.spawn_margin),
        Vec2::new(
            world.width - world.spawn_margin,
            world.height - world.spawn_margin,
        ),
    )
}

impl GameState {
    fn random_spawn_point(&mut self) -> Vec2 {
        let angle = self.rng.random_range(0.0..TAU);
        let tuning = &self.config.tuning;
        spawn_position(
            self.character.pos,
            angle,
            tuning.spawning.spawn_distance,
            &tuning.world,
        )
    }

    pub(crate) fn run_spawner(&mut self, dt_ms: f32) {
        let spawning = &self.config.tuning.spawning;
        self.spawner.update_difficulty(self.elapsed_ms, spawning);
        let count = self.spawner.advance(dt_ms, self.enemies.len(), spawning);
        for _ in 0..count {
            let kind = select_kind(self.elapsed_ms, &mut self.rng);
            let pos = self.random_spawn_point();
            self.spawn_enemy(kind, pos);
        }
    }

    /// Spawn the boss the first time elapsed time crosses the threshold
    pub(crate) fn check_boss_spawn(&mut self) {
        if self.boss_spawned || self.elapsed_ms < self.config.tuning.boss.spawn_at_ms as f64 {
            return;
        }
        self.boss_spawned = true;
        let pos = self.random_spawn_point();
        let id = self.spawn_enemy(EnemyKind::Boss, pos);
        log::info!("boss spawned at {:.1}s", self.elapsed_ms / 1000.0);
        self.events.push(GameEvent::BossSpawned { id });
    }
}
