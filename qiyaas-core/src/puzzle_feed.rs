use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use qiyaas_types::{CLUES_PER_PUZZLE, Puzzle};
use tracing::{error, info, warn};

use crate::hint_rules::clue_matches_rule;

/// Day the first puzzle was published; puzzle #001
pub const PUZZLE_START_DAY: &str = "2025-12-07";

/// Source of the daily puzzle
#[async_trait]
pub trait PuzzleFeed: Send + Sync {
    async fn fetch(&self) -> Result<Puzzle>;
}

/// Parse and sanity-check a `{date, clues}` payload
pub fn parse_puzzle_payload(payload: &str) -> Result<Puzzle> {
    let puzzle: Puzzle = serde_json::from_str(payload).context("Malformed puzzle payload")?;
    validate_puzzle(&puzzle)?;
    Ok(puzzle)
}

pub fn validate_puzzle(puzzle: &Puzzle) -> Result<()> {
    NaiveDate::parse_from_str(&puzzle.date, "%Y-%m-%d")
        .with_context(|| format!("Invalid puzzle date {:?}", puzzle.date))?;

    if puzzle.clues.len() != CLUES_PER_PUZZLE {
        bail!(
            "Expected {} clues, got {}",
            CLUES_PER_PUZZLE,
            puzzle.clues.len()
        );
    }

    for (index, clue) in puzzle.clues.iter().enumerate() {
        if clue.is_empty() {
            bail!("Clue {} has no word", index);
        }
        let word = clue.normalized_word();
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            bail!("Clue {} is not a plain word: {:?}", index, clue.word);
        }
        // 0 means the payload left it out
        let length = word.chars().count();
        if clue.word_length != 0 && clue.word_length != length {
            bail!(
                "Clue {} declares length {} but {:?} has {} letters",
                index, clue.word_length, clue.word, length
            );
        }
        if !(1..=9).contains(&clue.number) {
            bail!("Clue {} number {} outside 1-9", index, clue.number);
        }
        // Inconsistent generator output is still playable
        if !clue_matches_rule(clue) {
            warn!(
                "Clue {} ({}) number {} does not follow rule {:?}",
                index, clue.word, clue.number, clue.rule
            );
        }
    }

    Ok(())
}

/// Never fails: any feed error degrades to the empty-clue puzzle for `today`
pub async fn load_puzzle_or_fallback<F: PuzzleFeed + ?Sized>(feed: &F, today: &str) -> Puzzle {
    match feed.fetch().await.and_then(|puzzle| {
        validate_puzzle(&puzzle)?;
        Ok(puzzle)
    }) {
        Ok(puzzle) => {
            info!("Loaded puzzle for {}", puzzle.date);
            puzzle
        }
        Err(e) => {
            error!("Error fetching puzzle: {:#}", e);
            Puzzle::fallback(today)
        }
    }
}

/// 1-based puzzle number for a date, counted from the launch day
pub fn puzzle_number(date: &str) -> Option<i64> {
    let start = NaiveDate::parse_from_str(PUZZLE_START_DAY, "%Y-%m-%d").ok()?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some((date - start).num_days() + 1)
}
