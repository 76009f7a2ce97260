//! Monster patrol AI
//!
//! Monsters walk horizontally between two patrol columns. A move that would
//! land in solid terrain, a closed door or a live hazard spray is discarded
//! and the monster turns around instead.

use super::collision::{Aabb, overlaps};
use super::grid::TileGrid;
use super::state::{FrameEvents, Monster, World};
use crate::consts::TILE_SIZE;

/// Move every monster one tick and apply contact damage to the player
pub fn advance_monsters(world: &mut World, events: &mut FrameEvents) {
    let mut monsters = std::mem::take(&mut world.monsters);
    for monster in &mut monsters {
        patrol(monster, world);

        if overlaps(&monster.rect(), &world.player.rect()) {
            world.damage_player(events);
        }
    }
    world.monsters = monsters;
}

/// One patrol step for a single monster
fn patrol(monster: &mut Monster, world: &World) {
    // Bounds are checked before moving, so a monster that reached its last
    // column on the previous tick turns around now
    let column = monster.column();
    if monster.direction > 0 && column >= monster.patrol_max {
        monster.direction = -1;
    } else if monster.direction < 0 && column <= monster.patrol_min {
        monster.direction = 1;
    }

    let lower = monster.patrol_min as f32 * TILE_SIZE;
    let upper = ((monster.patrol_max + 1) as f32 * TILE_SIZE - monster.size.x).max(lower);
    let mut next = monster.pos;
    next.x = (next.x + monster.speed * monster.direction as f32).clamp(lower, upper);

    if is_blocked(&Aabb::new(next, monster.size), world) {
        monster.direction = -monster.direction;
    } else {
        monster.pos = next;
    }
}

/// True if the rectangle touches solid terrain, a closed door or hazard spray
fn is_blocked(rect: &Aabb, world: &World) -> bool {
    world.grid.cells_around(rect, 0).any(|(col, row)| {
        let blocking = world.is_solid_cell(col, row)
            || world.is_closed_door(col, row)
            || world.is_hazard_occupied(col, row);
        blocking && overlaps(rect, &TileGrid::cell_rect(col, row))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{GridPos, HazardPlacement, LevelDefinition, MonsterPlacement};
    use crate::sim::hazard::{HazardDirection, HazardPhase};
    use crate::tuning::Tuning;

    /// Eight columns of open floor with the monster in column `start`
    fn world_with_monster(start: i32, min: i32, max: i32, direction: i32) -> World {
        let level = LevelDefinition {
            grid: vec![vec![0; 8], vec![0; 8], vec![1; 8]],
            spawn: Some(GridPos { col: 0, row: 0 }),
            goal: Some(GridPos { col: 7, row: 0 }),
            monsters: vec![MonsterPlacement {
                col: start,
                row: 1,
                patrol_min: min,
                patrol_max: max,
                direction,
                speed: None,
                health: None,
            }],
            ..Default::default()
        };
        World::from_level(&level, Tuning::default()).unwrap()
    }

    fn tick(world: &mut World) -> FrameEvents {
        let mut events = FrameEvents::default();
        advance_monsters(world, &mut events);
        events
    }

    #[test]
    fn test_reverses_at_patrol_max_without_overshoot() {
        let mut world = world_with_monster(4, 2, 5, 1);
        let mut reached = false;
        for _ in 0..200 {
            let before = world.monsters[0].column();
            tick(&mut world);
            let m = &world.monsters[0];
            assert!(m.column() <= 5, "overshot to column {}", m.column());
            if before == 5 {
                // Reached the bound last tick: turned around this tick
                assert_eq!(m.direction, -1);
                reached = true;
                break;
            }
        }
        assert!(reached, "monster never reached its patrol bound");
    }

    #[test]
    fn test_patrol_stays_within_bounds() {
        let mut world = world_with_monster(3, 1, 4, -1);
        for _ in 0..1000 {
            tick(&mut world);
            let col = world.monsters[0].column();
            assert!((1..=4).contains(&col));
        }
    }

    #[test]
    fn test_wall_reverses_and_discards_move() {
        let mut world = world_with_monster(3, 0, 7, 1);
        world.grid.set(4, 1, crate::sim::grid::Tile::Wall);
        // Right edge exactly against the wall
        world.monsters[0].pos.x = 4.0 * TILE_SIZE - world.monsters[0].size.x;
        let before = world.monsters[0].pos;

        tick(&mut world);
        assert_eq!(world.monsters[0].direction, -1);
        assert_eq!(world.monsters[0].pos, before);
    }

    #[test]
    fn test_closed_door_blocks_patrol() {
        let mut world = world_with_monster(3, 0, 7, 1);
        world.doors.push(crate::sim::state::Door { id: 99, cell: (4, 1), open: false });
        world.monsters[0].pos.x = 4.0 * TILE_SIZE - world.monsters[0].size.x;

        tick(&mut world);
        assert_eq!(world.monsters[0].direction, -1);
    }

    #[test]
    fn test_active_hazard_spray_reverses() {
        let mut world = world_with_monster(3, 0, 7, 1);
        let mut hazard = crate::sim::hazard::TimedHazard::new(
            50,
            &HazardPlacement {
                col: 5,
                row: 0,
                direction: HazardDirection::Down,
                reach: 1,
                active_ticks: 10,
                rest_ticks: 10,
            },
            &world.tuning,
        );
        hazard.phase = HazardPhase::Active;
        hazard.occupied = vec![(4, 1)];
        world.hazards.push(hazard);
        world.monsters[0].pos.x = 4.0 * TILE_SIZE - world.monsters[0].size.x;

        tick(&mut world);
        assert_eq!(world.monsters[0].direction, -1);
    }

    #[test]
    fn test_contact_damage_respects_shared_cooldown() {
        let mut world = world_with_monster(1, 0, 7, 1);
        world.player.body.pos = world.monsters[0].pos;
        let start = world.health;

        assert!(tick(&mut world).damage_taken);
        assert!(!tick(&mut world).damage_taken);
        assert_eq!(world.health, start - 1);
    }
}
