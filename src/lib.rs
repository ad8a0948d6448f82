//! Stack Survivors - a survival-arena combat and progression simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character, weapons, enemies, spawning, XP, upgrades)
//! - `catalog`: Weapon definitions, upgrade catalog and enemy stat tables
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration and command errors
//!
//! Rendering, input devices and audio live outside this crate. They feed a
//! normalized direction into [`sim::tick`] and read state/events back out.

pub mod catalog;
pub mod error;
pub mod sim;
pub mod tuning;

pub use catalog::{Catalog, GameConfig};
pub use error::{CommandError, ConfigError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz, in ms)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Seed used when none is supplied
    pub const DEFAULT_SEED: u64 = 0x5EED_C0DE;
    /// Milliseconds per minute, for difficulty curves
    pub const MS_PER_MINUTE: f64 = 60_000.0;
}

/// Wrap an angle to [-π, π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Angle of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
