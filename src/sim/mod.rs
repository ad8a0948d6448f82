//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only (one `Pcg32` per run)
//! - Stable iteration order (spawn/drop order)
//! - No rendering or platform dependencies

pub mod character;
pub mod combat;
pub mod enemy;
pub mod event;
pub mod pickup;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrade;
pub mod weapon;

pub use character::{Acquisition, Character, StatTable, xp_for_level};
pub use combat::{Hit, closest_enemy, enemies_in_radius};
pub use enemy::{Enemy, hp_multiplier, select_kind};
pub use event::{EndReason, GameEvent, RunSummary};
pub use pickup::XpPickup;
pub use spawn::{SpawnDirector, spawn_position};
pub use state::{GameState, RunPhase};
pub use tick::{TickInput, start_run, tick};
pub use upgrade::{UpgradeOffer, apply_upgrade, is_eligible, roll_offer, weight};
pub use weapon::{Attack, Behavior, Loadout, WeaponInstance};
