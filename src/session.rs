//! Campaign lifecycle
//!
//! Wraps the pure `step` with the transitions the core leaves to its host:
//! a death rebuilds the level from its definition, a completion records the
//! run and loads the next level.

use crate::level::{Campaign, LevelError};
use crate::records::LevelRecord;
use crate::sim::state::{FrameEvents, World};
use crate::sim::tick::{TickInput, step};
use crate::tuning::Tuning;

/// A campaign in progress
#[derive(Debug, Clone)]
pub struct Session {
    names: Vec<String>,
    /// Freshly built world per level, cloned on every (re)start
    initial_worlds: Vec<World>,
    level_index: usize,
    world: World,
    records: Vec<LevelRecord>,
    finished: bool,
}

impl Session {
    /// Validate the tuning and build every level up front
    pub fn new(campaign: &Campaign, tuning: Tuning) -> Result<Self, LevelError> {
        if campaign.levels.is_empty() {
            return Err(LevelError::EmptyCampaign);
        }

        let initial_worlds = campaign
            .levels
            .iter()
            .map(|level| World::from_level(level, tuning.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let names = campaign
            .levels
            .iter()
            .enumerate()
            .map(|(i, level)| {
                if level.name.is_empty() {
                    format!("level-{}", i + 1)
                } else {
                    level.name.clone()
                }
            })
            .collect::<Vec<_>>();

        log::info!(
            "Campaign '{}' loaded with {} level(s)",
            campaign.name,
            initial_worlds.len()
        );
        log::info!("Level 1: {}", names[0]);

        Ok(Self {
            world: initial_worlds[0].clone(),
            names,
            initial_worlds,
            level_index: 0,
            records: Vec::new(),
            finished: false,
        })
    }

    /// Run one tick and apply any level transition it triggers
    pub fn advance(&mut self, input: &TickInput) -> FrameEvents {
        if self.finished {
            return FrameEvents::default();
        }

        let (next, events) = step(&self.world, input);

        if events.player_died {
            log::info!(
                "Died on '{}' after {} ticks ({} death(s) so far)",
                self.level_name(),
                next.frame,
                next.deaths
            );
            self.reset_level(next.deaths, next.elapsed_secs);
        } else if events.level_complete {
            self.complete_level(next);
        } else {
            self.world = next;
        }

        events
    }

    /// Start the current level over without counting a death
    pub fn restart(&mut self) {
        if self.finished {
            return;
        }
        log::info!("Restarting '{}'", self.level_name());
        self.reset_level(self.world.deaths, self.world.elapsed_secs);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_name(&self) -> &str {
        &self.names[self.level_index]
    }

    pub fn level_count(&self) -> usize {
        self.initial_worlds.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Completion records in the order levels were cleared
    pub fn records(&self) -> &[LevelRecord] {
        &self.records
    }

    fn reset_level(&mut self, deaths: u32, elapsed_secs: f64) {
        let mut world = self.initial_worlds[self.level_index].clone();
        world.deaths = deaths;
        world.elapsed_secs = elapsed_secs;
        self.world = world;
    }

    fn complete_level(&mut self, completed: World) {
        let record = LevelRecord {
            level: self.level_index,
            name: self.level_name().to_string(),
            ticks: completed.frame,
            elapsed_secs: completed.elapsed_secs,
            deaths: completed.deaths,
        };
        log::info!(
            "Cleared '{}' in {} ticks with {} death(s)",
            record.name,
            record.ticks,
            record.deaths
        );
        self.records.push(record);

        if self.level_index + 1 < self.initial_worlds.len() {
            self.level_index += 1;
            self.world = self.initial_worlds[self.level_index].clone();
            log::info!("Level {}: {}", self.level_index + 1, self.level_name());
        } else {
            self.world = completed;
            self.finished = true;
            log::info!("Campaign finished");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{GridPos, LevelDefinition};

    /// Spawn two cells left of the goal on a flat floor
    fn short_level(name: &str) -> LevelDefinition {
        LevelDefinition {
            name: name.into(),
            grid: vec![vec![1, 1, 1, 1, 1], vec![1, 0, 0, 0, 1], vec![1, 1, 1, 1, 1]],
            spawn: Some(GridPos { col: 1, row: 1 }),
            goal: Some(GridPos { col: 3, row: 1 }),
            ..Default::default()
        }
    }

    /// Hazard floor under the spawn
    fn deadly_level() -> LevelDefinition {
        LevelDefinition {
            name: "deadly".into(),
            grid: vec![vec![1, 1, 1, 1, 1], vec![1, 0, 0, 0, 1], vec![1, 3, 1, 1, 1]],
            spawn: Some(GridPos { col: 1, row: 1 }),
            goal: Some(GridPos { col: 3, row: 1 }),
            ..Default::default()
        }
    }

    fn campaign(levels: Vec<LevelDefinition>) -> Campaign {
        Campaign {
            name: "test".into(),
            levels,
        }
    }

    fn right() -> TickInput {
        TickInput {
            right: true,
            dt_secs: 1.0 / 60.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_invalid_level_up_front() {
        let mut broken = short_level("broken");
        broken.goal = None;
        let result = Session::new(&campaign(vec![short_level("ok"), broken]), Tuning::default());
        assert!(matches!(result, Err(LevelError::MissingGoal)));
    }

    #[test]
    fn test_rejects_invalid_tuning_up_front() {
        let tuning = Tuning {
            max_health: 0,
            ..Tuning::default()
        };
        let result = Session::new(&campaign(vec![short_level("ok")]), tuning);
        assert!(matches!(result, Err(LevelError::Tuning(_))));
    }

    #[test]
    fn test_rejects_empty_campaign() {
        let result = Session::new(&campaign(vec![]), Tuning::default());
        assert!(matches!(result, Err(LevelError::EmptyCampaign)));
    }

    #[test]
    fn test_completion_records_and_advances() {
        let mut session =
            Session::new(&campaign(vec![short_level("one"), short_level("two")]), Tuning::default())
                .unwrap();

        let mut cleared = false;
        for _ in 0..120 {
            if session.advance(&right()).level_complete {
                cleared = true;
                break;
            }
        }
        assert!(cleared);
        assert_eq!(session.level_index(), 1);
        assert_eq!(session.level_name(), "two");
        assert_eq!(session.world().frame, 0);
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].name, "one");
        assert!(session.records()[0].ticks > 0);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_last_level_finishes_campaign() {
        let mut session =
            Session::new(&campaign(vec![short_level("only")]), Tuning::default()).unwrap();
        for _ in 0..120 {
            session.advance(&right());
        }
        assert!(session.is_finished());
        assert_eq!(session.records().len(), 1);

        // Finished sessions ignore further input
        let frame = session.world().frame;
        assert!(session.advance(&right()).is_quiet());
        assert_eq!(session.world().frame, frame);
    }

    #[test]
    fn test_death_resets_level_and_keeps_count() {
        let mut session = Session::new(&campaign(vec![deadly_level()]), Tuning::default()).unwrap();
        let idle = TickInput { dt_secs: 0.5, ..Default::default() };

        let mut died = false;
        for _ in 0..600 {
            if session.advance(&idle).player_died {
                died = true;
                break;
            }
        }
        assert!(died);
        let world = session.world();
        assert_eq!(world.deaths, 1);
        assert_eq!(world.health, world.tuning.starting_health);
        assert_eq!(world.frame, 0);
        assert!(world.elapsed_secs > 0.0);
        assert_eq!(session.level_index(), 0);
    }

    #[test]
    fn test_restart_is_not_a_death() {
        let mut session =
            Session::new(&campaign(vec![short_level("one")]), Tuning::default()).unwrap();
        for _ in 0..5 {
            session.advance(&TickInput::default());
        }
        session.restart();
        assert_eq!(session.world().deaths, 0);
        assert_eq!(session.world().frame, 0);
    }

    #[test]
    fn test_unnamed_levels_get_positional_names() {
        let session = Session::new(&campaign(vec![short_level("")]), Tuning::default()).unwrap();
        assert_eq!(session.level_name(), "level-1");
    }
}
