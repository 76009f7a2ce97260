//! Data-driven game balance
//!
//! Every numeric knob of the simulation lives here. Durations are tick
//! counts and speeds are pixels per tick, both at `tick_rate` (which starts
//! at [`TICK_RATE`](crate::consts::TICK_RATE)). Partial JSON files override
//! only the fields they name.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{TICK_RATE, TILE_SIZE};

/// Errors raised while loading or validating tuning
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
    #[error("tuning value `{field}` must be within {range}, got {value}")]
    OutOfUnitRange {
        field: &'static str,
        range: &'static str,
        value: f32,
    },
}

/// Numeric tuning for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Host step rate every tick-denominated value below is expressed in
    pub tick_rate: u32,

    // === Player movement ===
    /// Horizontal speed while a direction is held
    pub move_speed: f32,
    /// Horizontal velocity multiplier applied when no direction is held
    pub horizontal_damping: f32,
    /// Upward speed applied on jump
    pub jump_speed: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Maximum downward speed
    pub terminal_velocity: f32,
    /// Player bounding box
    pub player_size: Vec2,

    // === Health & damage ===
    pub starting_health: i32,
    pub max_health: i32,
    /// Shared cooldown after any damage instance
    pub damage_cooldown_ticks: u32,
    /// Presentation hints set on damage
    pub shake_ticks: u32,
    pub invincibility_ticks: u32,

    // === Monsters ===
    pub monster_size: Vec2,
    pub monster_speed: f32,
    pub monster_health: i32,

    // === Weapons ===
    pub projectile_speed: f32,
    pub projectile_size: Vec2,
    /// Horizontal distance from the player's center to the spawn point
    pub projectile_spawn_offset: f32,
    pub fire_cooldown_ticks: u32,
    pub weapon_ammo_bonus: u32,
    pub explosive_fuse_ticks: u32,
    /// Chebyshev radius in tiles
    pub blast_radius: i32,

    // === Timed hazards ===
    /// Trailing fraction of the rest phase flagged as warning
    pub hazard_warning_fraction: f32,
    /// Ticks between successive tiles of the spray reveal
    pub hazard_spray_interval: u32,

    // === Puzzle ===
    pub collectible_size: Vec2,
    /// Per-axis door reach, in tiles
    pub door_open_range_tiles: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,

            move_speed: 3.0,
            horizontal_damping: 0.8,
            jump_speed: 10.0,
            gravity: 0.5,
            terminal_velocity: 12.0,
            player_size: Vec2::new(20.0, 28.0),

            starting_health: 3,
            max_health: 3,
            damage_cooldown_ticks: 60,
            shake_ticks: 12,
            invincibility_ticks: 60,

            monster_size: Vec2::new(28.0, 28.0),
            monster_speed: 1.0,
            monster_health: 2,

            projectile_speed: 8.0,
            projectile_size: Vec2::new(8.0, 4.0),
            projectile_spawn_offset: 12.0,
            fire_cooldown_ticks: 15,
            weapon_ammo_bonus: 10,
            explosive_fuse_ticks: 2 * TICK_RATE,
            blast_radius: 1,

            hazard_warning_fraction: 0.25,
            hazard_spray_interval: 4,

            collectible_size: Vec2::new(20.0, 20.0),
            door_open_range_tiles: 1.5,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would make the simulation degenerate
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("move_speed", self.move_speed),
            ("jump_speed", self.jump_speed),
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("player_size.x", self.player_size.x),
            ("player_size.y", self.player_size.y),
            ("monster_size.x", self.monster_size.x),
            ("monster_size.y", self.monster_size.y),
            ("monster_speed", self.monster_speed),
            ("projectile_speed", self.projectile_speed),
            ("projectile_size.x", self.projectile_size.x),
            ("projectile_size.y", self.projectile_size.y),
            ("collectible_size.x", self.collectible_size.x),
            ("collectible_size.y", self.collectible_size.y),
            ("door_open_range_tiles", self.door_open_range_tiles),
            ("max_health", self.max_health as f32),
            ("starting_health", self.starting_health as f32),
            ("monster_health", self.monster_health as f32),
            ("hazard_spray_interval", self.hazard_spray_interval as f32),
            ("tick_rate", self.tick_rate as f32),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.horizontal_damping) {
            return Err(TuningError::OutOfUnitRange {
                field: "horizontal_damping",
                range: "[0, 1]",
                value: self.horizontal_damping,
            });
        }
        // At least one resting tick per cycle
        if !(0.0..1.0).contains(&self.hazard_warning_fraction) {
            return Err(TuningError::OutOfUnitRange {
                field: "hazard_warning_fraction",
                range: "[0, 1)",
                value: self.hazard_warning_fraction,
            });
        }
        Ok(())
    }

    /// Door reach in pixels
    #[inline]
    pub fn door_open_range(&self) -> f32 {
        self.door_open_range_tiles * TILE_SIZE
    }

    /// Rescale tick-denominated values for a host stepping at `tick_rate`
    ///
    /// Speeds shrink and durations grow as the rate rises, so one second of
    /// play covers the same distance and time either way.
    pub fn rescaled(&self, tick_rate: u32) -> Self {
        let tick_rate = tick_rate.max(1);
        let ratio = self.tick_rate.max(1) as f32 / tick_rate as f32;
        let ticks = |t: u32| scale_ticks(t, ratio);
        Self {
            tick_rate,
            move_speed: self.move_speed * ratio,
            horizontal_damping: self.horizontal_damping.powf(ratio),
            jump_speed: self.jump_speed * ratio,
            gravity: self.gravity * ratio * ratio,
            terminal_velocity: self.terminal_velocity * ratio,
            damage_cooldown_ticks: ticks(self.damage_cooldown_ticks),
            shake_ticks: ticks(self.shake_ticks),
            invincibility_ticks: ticks(self.invincibility_ticks),
            monster_speed: self.monster_speed * ratio,
            projectile_speed: self.projectile_speed * ratio,
            fire_cooldown_ticks: ticks(self.fire_cooldown_ticks),
            explosive_fuse_ticks: ticks(self.explosive_fuse_ticks),
            hazard_spray_interval: ticks(self.hazard_spray_interval),
            ..self.clone()
        }
    }

    /// Convert a level-authored duration (in `TICK_RATE` ticks) to this rate
    pub fn level_ticks(&self, ticks: u32) -> u32 {
        scale_ticks(ticks, self.level_ratio())
    }

    /// Convert a level-authored speed (pixels per `TICK_RATE` tick) to this rate
    pub fn level_speed(&self, speed: f32) -> f32 {
        speed * self.level_ratio()
    }

    fn level_ratio(&self) -> f32 {
        TICK_RATE as f32 / self.tick_rate.max(1) as f32
    }
}

fn scale_ticks(ticks: u32, ratio: f32) -> u32 {
    ((ticks as f32 / ratio).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 0.75, "blast_radius": 2 }"#).unwrap();
        assert_eq!(tuning.gravity, 0.75);
        assert_eq!(tuning.blast_radius, 2);
        assert_eq!(tuning.move_speed, Tuning::default().move_speed);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let err = Tuning::from_json(r#"{ "move_speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::NonPositive { field: "move_speed", .. }));
    }

    #[test]
    fn test_rejects_damping_above_one() {
        let err = Tuning::from_json(r#"{ "horizontal_damping": 1.5 }"#).unwrap_err();
        assert!(matches!(err, TuningError::OutOfUnitRange { .. }));
    }

    #[test]
    fn test_rescale_to_double_rate() {
        let base = Tuning::default();
        let fast = base.rescaled(120);
        assert!((fast.move_speed - base.move_speed / 2.0).abs() < 1e-5);
        assert_eq!(fast.damage_cooldown_ticks, base.damage_cooldown_ticks * 2);
        assert_eq!(fast.explosive_fuse_ticks, base.explosive_fuse_ticks * 2);
        // Sizes are in pixels, not ticks
        assert_eq!(fast.player_size, base.player_size);
    }

    #[test]
    fn test_rescale_at_native_rate_is_identity() {
        assert_eq!(Tuning::default().rescaled(TICK_RATE), Tuning::default());
    }

    #[test]
    fn test_rescale_does_not_compound() {
        let base = Tuning::default();
        let twice = base.rescaled(120).rescaled(120);
        assert_eq!(twice, base.rescaled(120));
        let back = base.rescaled(120).rescaled(TICK_RATE);
        assert_eq!(back.damage_cooldown_ticks, base.damage_cooldown_ticks);
        assert!((back.move_speed - base.move_speed).abs() < 1e-5);
    }

    #[test]
    fn test_level_values_follow_tick_rate() {
        let fast = Tuning::default().rescaled(120);
        assert_eq!(fast.level_ticks(30), 60);
        assert!((fast.level_speed(2.0) - 1.0).abs() < 1e-6);
        assert_eq!(Tuning::default().level_ticks(30), 30);
    }

    #[test]
    fn test_rejects_full_warning_fraction() {
        let err = Tuning::from_json(r#"{ "hazard_warning_fraction": 1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfUnitRange { field: "hazard_warning_fraction", .. }
        ));
        assert!(Tuning::from_json(r#"{ "hazard_warning_fraction": 0.99 }"#).is_ok());
    }

    #[test]
    fn test_rejects_zero_max_health() {
        let tuning = Tuning { max_health: 0, ..Tuning::default() };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { field: "max_health", .. })
        ));
    }
}
