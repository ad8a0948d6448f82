//! XP pickups: drift, magnet attraction and collection

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::event::GameEvent;
use super::state::GameState;
use crate::polar_to_cartesian;
use crate::tuning::ProgressionTuning;

#[derive(Debug, Clone, Serialize)]
pub struct XpPickup {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub value: u32,
    /// Homing on the character; never reverts
    pub attracted: bool,
    collected: bool,
}

impl XpPickup {
    /// Drop a pickup with a small random drift
    pub fn new(
        id: u32,
        pos: Vec2,
        value: u32,
        rng: &mut Pcg32,
        tuning: &ProgressionTuning,
    ) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = if tuning.drift_speed_max > tuning.drift_speed_min {
            rng.random_range(tuning.drift_speed_min..tuning.drift_speed_max)
        } else {
            tuning.drift_speed_min
        };
        Self {
            id,
            pos,
            vel: polar_to_cartesian(speed, angle),
            value,
            attracted: false,
            collected: false,
        }
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Home in on `target` at `speed`, overriding any drift
    pub fn attract(&mut self, target: Vec2, speed: f32) {
        self.attracted = true;
        self.vel = (target - self.pos).normalize_or_zero() * speed;
    }

    /// Integrate one step; free drift slows down under `drag`
    pub fn step(&mut self, dt_ms: f32, drag: f32) {
        let dt = dt_ms / 1000.0;
        if !self.attracted {
            let speed = self.vel.length();
            let slowed = (speed - drag * dt).max(0.0);
            self.vel = self.vel.normalize_or_zero() * slowed;
        }
        self.pos += self.vel * dt;
    }

    /// Take the XP value; only the first call yields it
    pub fn collect(&mut self) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.collected = true;
        Some(self.value)
    }
}

impl GameState {
    pub(crate) fn drop_pickup(&mut self, pos: Vec2, value: u32) {
        let id = self.next_entity_id();
        let pickup = XpPickup::new(id, pos, value, &mut self.rng, &self.config.tuning.progression);
        self.events.push(GameEvent::PickupSpawned { id, pos, value });
        self.pickups.push(pickup);
    }

    /// Magnet, movement and collection. Stops collecting as soon as a level-up
    /// opens an offer; the rest stay on the field for later ticks.
    pub(crate) fn update_pickups(&mut self, dt_ms: f32) {
        let tuning = self.config.tuning.progression.clone();
        let center = self.character.pos;
        let magnet = self.character.magnet_range(&tuning);

        for pickup in &mut self.pickups {
            if pickup.attracted || pickup.pos.distance(center) <= magnet {
                pickup.attract(center, tuning.pickup_speed);
            }
            pickup.step(dt_ms, tuning.drift_drag);
        }

        for i in 0..self.pickups.len() {
            if self.offer.is_some() {
                break;
            }
            let pickup = &mut self.pickups[i];
            if pickup.pos.distance(center) > tuning.pickup_radius {
                continue;
            }
            let Some(value) = pickup.collect() else {
                continue;
            };
            let id = pickup.id;
            let xp = self.character.add_xp(value);
            self.events.push(GameEvent::PickupCollected { id, xp });
            self.check_level_up();
        }

        self.pickups.retain(|p| !p.is_collected());
    }
}
