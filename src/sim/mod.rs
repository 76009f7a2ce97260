//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (the autopilot, never the core)
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod hazard;
pub mod monster;
pub mod projectile;
pub mod puzzle;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{Aabb, Body, Correction, overlaps, resolve};
pub use grid::{Tile, TileGrid};
pub use hazard::{HazardDirection, HazardPhase, TimedHazard};
pub use state::{
    Collectible, CollectibleKind, Door, Explosive, Facing, FrameEvents, Monster, Player,
    Projectile, World,
};
pub use tick::{TickInput, step};
