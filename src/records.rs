//! Level completion records
//!
//! Produced by the session when a level is cleared. Storage is left to the
//! host; the table serializes to JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One completed level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Index in the campaign
    pub level: usize,
    pub name: String,
    /// Simulation ticks for the successful attempt
    pub ticks: u64,
    /// Wall-clock seconds across all attempts
    pub elapsed_secs: f64,
    pub deaths: u32,
}

impl LevelRecord {
    /// Fewer ticks wins; deaths break ties
    pub fn beats(&self, other: &LevelRecord) -> bool {
        (self.ticks, self.deaths) < (other.ticks, other.deaths)
    }
}

/// Best record per level, keyed by level name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestRecords {
    pub entries: BTreeMap<String, LevelRecord>,
}

impl BestRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record; returns true if it became the level's best
    pub fn submit(&mut self, record: LevelRecord) -> bool {
        match self.entries.get(&record.name) {
            Some(best) if !record.beats(best) => false,
            _ => {
                log::info!(
                    "New best for '{}': {} ticks, {} death(s)",
                    record.name,
                    record.ticks,
                    record.deaths
                );
                self.entries.insert(record.name.clone(), record);
                true
            }
        }
    }

    pub fn best(&self, name: &str) -> Option<&LevelRecord> {
        self.entries.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, ticks: u64, deaths: u32) -> LevelRecord {
        LevelRecord {
            level: 0,
            name: name.into(),
            ticks,
            elapsed_secs: ticks as f64 / 60.0,
            deaths,
        }
    }

    #[test]
    fn test_first_submit_is_best() {
        let mut best = BestRecords::new();
        assert!(best.is_empty());
        assert!(best.submit(record("a", 300, 2)));
        assert_eq!(best.best("a").map(|r| r.ticks), Some(300));
    }

    #[test]
    fn test_only_faster_runs_replace() {
        let mut best = BestRecords::new();
        best.submit(record("a", 300, 0));
        assert!(!best.submit(record("a", 400, 0)));
        assert!(!best.submit(record("a", 300, 0)));
        assert!(best.submit(record("a", 250, 5)));
        assert_eq!(best.best("a").map(|r| r.ticks), Some(250));
    }

    #[test]
    fn test_deaths_break_ties() {
        let mut best = BestRecords::new();
        best.submit(record("a", 300, 3));
        assert!(best.submit(record("a", 300, 1)));
        assert_eq!(best.best("a").map(|r| r.deaths), Some(1));
    }

    #[test]
    fn test_levels_are_independent() {
        let mut best = BestRecords::new();
        best.submit(record("a", 300, 0));
        assert!(best.submit(record("b", 900, 0)));
        assert_eq!(best.entries.len(), 2);
    }

    #[test]
    fn test_table_survives_json() {
        let mut best = BestRecords::new();
        best.submit(record("a", 300, 1));
        best.submit(record("b", 120, 0));
        let json = best.to_json().unwrap();
        assert_eq!(BestRecords::from_json(&json).unwrap(), best);
    }
}
