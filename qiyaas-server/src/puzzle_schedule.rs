use std::collections::BTreeMap;
use std::path::Path;

use qiyaas_core::validate_puzzle;
use qiyaas_types::Puzzle;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Failed to read puzzle schedule {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write puzzle schedule {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed puzzle schedule: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Generated puzzles keyed by their `YYYY-MM-DD` date
#[derive(Debug, Clone, Default)]
pub struct PuzzleSchedule {
    puzzles: BTreeMap<String, Puzzle>,
}

impl PuzzleSchedule {
    /// Parse a JSON array of puzzles; entries that fail validation are skipped
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let entries: Vec<Puzzle> = serde_json::from_str(json)?;
        let mut puzzles = BTreeMap::new();

        for puzzle in entries {
            if let Err(e) = validate_puzzle(&puzzle) {
                warn!("Skipping scheduled puzzle {}: {:#}", puzzle.date, e);
                continue;
            }
            if puzzles.contains_key(&puzzle.date) {
                warn!("Duplicate puzzle for {}, keeping the first", puzzle.date);
                continue;
            }
            puzzles.insert(puzzle.date.clone(), puzzle);
        }

        Ok(Self { puzzles })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScheduleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScheduleError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let schedule = Self::from_json(&json)?;
        info!(
            "Loaded {} scheduled puzzles from {}",
            schedule.len(),
            path.display()
        );
        Ok(schedule)
    }

    /// Add a puzzle unless its date is taken. Returns whether it was added.
    pub fn insert(&mut self, puzzle: Puzzle) -> bool {
        if self.puzzles.contains_key(&puzzle.date) {
            warn!("Puzzle for {} already scheduled", puzzle.date);
            return false;
        }
        self.puzzles.insert(puzzle.date.clone(), puzzle);
        true
    }

    /// The schedule as a JSON array in date order
    pub fn to_json(&self) -> Result<String, ScheduleError> {
        let puzzles: Vec<&Puzzle> = self.puzzles.values().collect();
        Ok(serde_json::to_string_pretty(&puzzles)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScheduleError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ScheduleError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {} scheduled puzzles to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, date: &str) -> Option<&Puzzle> {
        self.puzzles.get(date)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.puzzles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = r#"[
        {"date": "2025-12-07", "clues": [
            {"type": "NOUN", "word": "honey", "rule": "alphabet_rule", "number": 8},
            {"type": "VERB", "word": "arrive", "rule": "length_rule", "number": 6},
            {"type": "ADJECTIVE", "word": "smart", "rule": "number_rule", "number": 6}
        ]},
        {"date": "2025-12-08", "clues": [
            {"type": "NOUN", "word": "bee", "rule": "alphabet_rule", "number": 2}
        ]}
    ]"#;

    #[test]
    fn test_invalid_entries_are_skipped() {
        let schedule = PuzzleSchedule::from_json(SCHEDULE).unwrap();

        assert_eq!(schedule.len(), 1);
        assert!(schedule.get("2025-12-07").is_some());
        assert!(schedule.get("2025-12-08").is_none());
        assert_eq!(schedule.dates().collect::<Vec<_>>(), vec!["2025-12-07"]);
    }

    #[test]
    fn test_insert_keeps_existing_date_and_round_trips() {
        let mut schedule = PuzzleSchedule::from_json(SCHEDULE).unwrap();
        let existing = schedule.get("2025-12-07").cloned().unwrap();

        let mut replacement = existing.clone();
        replacement.clues.swap(0, 1);
        assert!(!schedule.insert(replacement));
        assert_eq!(schedule.get("2025-12-07"), Some(&existing));

        let mut next = existing.clone();
        next.date = "2025-12-06".to_string();
        assert!(schedule.insert(next));

        let reloaded = PuzzleSchedule::from_json(&schedule.to_json().unwrap()).unwrap();
        assert_eq!(
            reloaded.dates().collect::<Vec<_>>(),
            vec!["2025-12-06", "2025-12-07"]
        );
    }

    #[test]
    fn test_malformed_schedule() {
        assert!(matches!(
            PuzzleSchedule::from_json("{\"date\": 1}"),
            Err(ScheduleError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = PuzzleSchedule::load("./does/not/exist.json").unwrap_err();
        assert!(matches!(err, ScheduleError::Read { .. }));
    }
}
