//! World snapshot and entity types
//!
//! A [`World`] is the complete state the frame pipeline reads and writes.
//! Levels are authored in grid coordinates; everything here is in pixels
//! except cells, which stay on the grid.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, Body};
use super::grid::TileGrid;
use super::hazard::TimedHazard;
use crate::consts::TILE_SIZE;
use crate::level::{LevelDefinition, LevelError};
use crate::tuning::Tuning;
use crate::{Cell, cell_to_pixel};

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// The player character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub facing: Facing,
    pub has_weapon: bool,
    /// Ticks until another shot is allowed
    pub fire_cooldown: u32,
    /// Presentation hint after damage
    pub shake_ticks: u32,
    /// Presentation hint after damage
    pub invincibility_ticks: u32,
}

impl Player {
    #[inline]
    pub fn rect(&self) -> Aabb {
        self.body.rect()
    }
}

/// A patrolling monster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Inclusive patrol columns
    pub patrol_min: i32,
    pub patrol_max: i32,
    /// +1 or -1
    pub direction: i32,
    pub speed: f32,
    pub health: i32,
}

impl Monster {
    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Column containing the monster's center
    #[inline]
    pub fn column(&self) -> i32 {
        ((self.pos.x + self.size.x * 0.5) / TILE_SIZE).floor() as i32
    }
}

/// What a collectible does when picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Key,
    Weapon,
    ExplosiveCharge,
    HealthPickup,
    ScoreToken,
}

/// A pickup placed in the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub rect: Aabb,
    /// Never reverts once set
    pub collected: bool,
}

/// A lockable door occupying one cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub id: u32,
    pub cell: Cell,
    /// Never reverts once set
    pub open: bool,
}

impl Door {
    #[inline]
    pub fn rect(&self) -> Aabb {
        TileGrid::cell_rect(self.cell.0, self.cell.1)
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub rect: Aabb,
    pub vel_x: f32,
}

/// An armed explosive counting down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosive {
    pub id: u32,
    pub cell: Cell,
    pub fuse_ticks: u32,
}

/// Discrete gameplay outcomes of one tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub level_complete: bool,
    pub player_died: bool,
    pub door_opened: bool,
    pub damage_taken: bool,
    pub item_collected: bool,
    pub explosive_detonated: bool,
    pub projectile_fired: bool,
    pub monster_killed: bool,
    /// Kinds picked up this tick, in pickup order
    pub collected: Vec<CollectibleKind>,
}

impl FrameEvents {
    /// True if nothing happened
    pub fn is_quiet(&self) -> bool {
        *self == Self::default()
    }
}

/// Complete simulation state for one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub grid: TileGrid,
    pub tuning: Tuning,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub collectibles: Vec<Collectible>,
    pub doors: Vec<Door>,
    pub projectiles: Vec<Projectile>,
    pub explosives: Vec<Explosive>,
    pub hazards: Vec<TimedHazard>,

    // === Session counters ===
    pub keys: u32,
    pub ammo: u32,
    pub explosive_charges: u32,
    pub health: i32,
    pub max_health: i32,
    /// Shared by every damage source
    pub damage_cooldown: u32,
    pub deaths: u32,
    /// Wall-clock seconds, cosmetic only
    pub elapsed_secs: f64,
    /// Monotonic tick counter
    pub frame: u64,

    pub spawn: Cell,
    pub goal: Cell,
    next_id: u32,
}

impl World {
    /// Translate a level definition into a runtime world
    ///
    /// The definition is validated first; nothing malformed reaches `step`.
    pub fn from_level(level: &LevelDefinition, tuning: Tuning) -> Result<Self, LevelError> {
        tuning.validate()?;
        let valid = level.validate()?;

        let mut world = World {
            grid: valid.grid,
            health: tuning.starting_health.min(tuning.max_health),
            max_health: tuning.max_health,
            spawn: valid.spawn,
            goal: valid.goal,
            next_id: 1,
            ..Default::default()
        };

        let player_size = tuning.player_size;
        world.player = Player {
            body: Body::new(standing_in_cell(valid.spawn, player_size), player_size),
            ..Default::default()
        };

        for placement in &level.monsters {
            let size = tuning.monster_size;
            let monster = Monster {
                id: world.next_entity_id(),
                pos: standing_in_cell((placement.col, placement.row), size),
                size,
                patrol_min: placement.patrol_min,
                patrol_max: placement.patrol_max,
                direction: placement.direction.signum(),
                speed: placement
                    .speed
                    .map_or(tuning.monster_speed, |speed| tuning.level_speed(speed)),
                health: placement.health.unwrap_or(tuning.monster_health),
            };
            world.monsters.push(monster);
        }

        for placement in &level.collectibles {
            let size = tuning.collectible_size;
            let inset = (Vec2::splat(TILE_SIZE) - size) * 0.5;
            let min = cell_to_pixel(placement.col, placement.row) + inset;
            let collectible = Collectible {
                id: world.next_entity_id(),
                kind: placement.kind,
                rect: Aabb::new(min, size),
                collected: false,
            };
            world.collectibles.push(collectible);
        }

        for pos in &level.doors {
            let door = Door {
                id: world.next_entity_id(),
                cell: (pos.col, pos.row),
                open: false,
            };
            world.doors.push(door);
        }

        for placement in &level.hazards {
            let id = world.next_entity_id();
            world.hazards.push(TimedHazard::new(id, placement, &tuning));
        }

        world.tuning = tuning;
        log::debug!(
            "Built world '{}': {}x{} tiles, {} monsters, {} collectibles, {} doors, {} hazards",
            level.name,
            world.grid.width(),
            world.grid.height(),
            world.monsters.len(),
            world.collectibles.len(),
            world.doors.len(),
            world.hazards.len()
        );
        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Pixel rectangle of the goal cell
    pub fn goal_rect(&self) -> Aabb {
        TileGrid::cell_rect(self.goal.0, self.goal.1)
    }

    /// Static terrain blocking the player: solid tiles and hazard sources
    pub fn is_solid_cell(&self, col: i32, row: i32) -> bool {
        self.grid.tile_at(col, row).is_solid()
            || self.hazards.iter().any(|h| h.source == (col, row))
    }

    /// True if a closed door occupies the cell
    pub fn is_closed_door(&self, col: i32, row: i32) -> bool {
        self.doors.iter().any(|d| !d.open && d.cell == (col, row))
    }

    /// True if an active hazard is currently spraying into the cell
    pub fn is_hazard_occupied(&self, col: i32, row: i32) -> bool {
        self.hazards.iter().any(|h| h.occupies((col, row)))
    }

    /// Apply one unit of damage unless the shared cooldown is running
    ///
    /// Returns whether damage was dealt.
    pub fn damage_player(&mut self, events: &mut FrameEvents) -> bool {
        if self.damage_cooldown > 0 || self.health <= 0 {
            return false;
        }
        self.health -= 1;
        self.damage_cooldown = self.tuning.damage_cooldown_ticks;
        self.player.shake_ticks = self.tuning.shake_ticks;
        self.player.invincibility_ticks = self.tuning.invincibility_ticks;
        events.damage_taken = true;
        true
    }
}

/// Position that centers `size` horizontally in a cell and rests it on the cell floor
fn standing_in_cell(cell: Cell, size: Vec2) -> Vec2 {
    cell_to_pixel(cell.0, cell.1) + Vec2::new((TILE_SIZE - size.x) * 0.5, TILE_SIZE - size.y)
}
