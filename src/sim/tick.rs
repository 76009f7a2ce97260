//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world by one tick. The stage order is
//! fixed: later stages read what earlier ones wrote.

use glam::Vec2;

use super::collision::{Aabb, overlaps, resolve};
use super::grid::TileGrid;
use super::monster::advance_monsters;
use super::projectile::{advance_explosives, advance_projectiles, fire, place_explosive};
use super::puzzle::{collect_items, collide_doors, open_nearest_door};
use super::state::{Facing, FrameEvents, World};

/// Input commands for a single tick (held state of each action)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
    pub place_explosive: bool,
    pub open_door: bool,
    /// Wall-clock seconds since the previous tick (cosmetic timer only)
    pub dt_secs: f64,
}

/// Advance the world by one fixed timestep
///
/// The input snapshot is never modified; the returned world is a new value.
/// An unloaded world (empty grid) is returned unchanged.
pub fn step(world: &World, input: &TickInput) -> (World, FrameEvents) {
    let mut events = FrameEvents::default();
    if world.grid.is_empty() {
        return (world.clone(), events);
    }

    let mut next = world.clone();
    next.elapsed_secs += input.dt_secs;

    // 1. Horizontal input and jump
    apply_input(&mut next, input);

    // 2-3. Gravity, then integrate
    let body = &mut next.player.body;
    body.vel.y = (body.vel.y + next.tuning.gravity).min(next.tuning.terminal_velocity);
    body.pos += body.vel;

    // 4. Tiles and world edges
    resolve_terrain(&mut next);

    // Hazards advance before anything reads their spray this tick
    for hazard in &mut next.hazards {
        hazard.advance(&next.grid, &next.tuning);
    }

    // 5. Monsters and contact damage
    advance_monsters(&mut next, &mut events);

    // 6. Hazard tiles and hazard spray
    apply_environment_damage(&mut next, &mut events);

    // 7. Death ends the tick
    if next.health <= 0 {
        next.deaths += 1;
        events.player_died = true;
        log::debug!("Player died (death #{}) at frame {}", next.deaths, next.frame);
        return (next, events);
    }

    // 8. Doors: explicit open, then closed doors act as walls
    if input.open_door {
        open_nearest_door(&mut next, &mut events);
    }
    collide_doors(&mut next);

    // 9. Pickups
    collect_items(&mut next, &mut events);

    // 10. Projectiles
    if input.fire {
        fire(&mut next, &mut events);
    }
    advance_projectiles(&mut next, &mut events);

    // 11. Explosives
    if input.place_explosive {
        place_explosive(&mut next);
    }
    advance_explosives(&mut next, &mut events);

    // 12. Goal
    if overlaps(&next.player.rect(), &next.goal_rect()) {
        events.level_complete = true;
    }

    // 13. Frame counter and transient timers
    advance_timers(&mut next);

    (next, events)
}

fn apply_input(world: &mut World, input: &TickInput) {
    let tuning = &world.tuning;
    let player = &mut world.player;
    match (input.left, input.right) {
        (true, false) => {
            player.body.vel.x = -tuning.move_speed;
            player.facing = Facing::Left;
        }
        (false, true) => {
            player.body.vel.x = tuning.move_speed;
            player.facing = Facing::Right;
        }
        // Neither (or both) held: coast to a stop
        _ => {
            player.body.vel.x *= tuning.horizontal_damping;
            if player.body.vel.x.abs() < 0.01 {
                player.body.vel.x = 0.0;
            }
        }
    }

    if input.jump && player.body.on_ground {
        player.body.vel.y = -tuning.jump_speed;
        player.body.on_ground = false;
    }
}

/// Push the player out of nearby solid cells and the four world edges
fn resolve_terrain(world: &mut World) {
    world.player.body.on_ground = false;

    let rect = world.player.rect();
    let solid: Vec<Aabb> = world
        .grid
        .cells_around(&rect, 1)
        .filter(|&(col, row)| world.is_solid_cell(col, row))
        .map(|(col, row)| TileGrid::cell_rect(col, row))
        .collect();

    let walls = world.grid.boundary_walls();
    let body = &mut world.player.body;
    for obstacle in solid.iter().chain(walls.iter()) {
        resolve(body, obstacle);
    }
}

fn apply_environment_damage(world: &mut World, events: &mut FrameEvents) {
    let rect = world.player.rect();

    let on_hazard_tile = world.player.body.on_ground && {
        // One-pixel strip under the feet
        let feet = Aabb::new(Vec2::new(rect.min.x, rect.max().y), Vec2::new(rect.size.x, 1.0));
        world.grid.cells_around(&feet, 0).any(|(col, row)| {
            world.grid.tile_at(col, row).is_hazardous()
                && overlaps(&feet, &TileGrid::cell_rect(col, row))
        })
    };

    let in_spray = world
        .hazards
        .iter()
        .filter(|h| h.is_active())
        .flat_map(|h| h.occupied_rects())
        .any(|cell| overlaps(&rect, &cell));

    if on_hazard_tile || in_spray {
        world.damage_player(events);
    }
}

fn advance_timers(world: &mut World) {
    world.frame += 1;
    world.damage_cooldown = world.damage_cooldown.saturating_sub(1);
    let player = &mut world.player;
    player.shake_ticks = player.shake_ticks.saturating_sub(1);
    player.invincibility_ticks = player.invincibility_ticks.saturating_sub(1);
    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);
}
