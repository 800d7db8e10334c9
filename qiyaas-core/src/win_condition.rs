use std::collections::BTreeSet;

use qiyaas_types::{GameOutcome, Puzzle};
use tracing::info;

/// Letter-set coverage: every letter of the word appears among `revealed`.
/// Positions are not considered. An empty word is never complete.
pub fn is_clue_complete(word: &str, revealed: &BTreeSet<char>) -> bool {
    let word = word.trim().to_uppercase();
    if word.is_empty() {
        return false;
    }
    word.chars()
        .all(|letter| revealed.contains(&letter.to_ascii_uppercase()))
}

/// Indices of the clues fully covered by `revealed`
pub fn get_solved_clues(puzzle: &Puzzle, revealed: &BTreeSet<char>) -> BTreeSet<usize> {
    puzzle
        .clues
        .iter()
        .enumerate()
        .filter(|(_, clue)| is_clue_complete(&clue.word, revealed))
        .map(|(index, _)| index)
        .collect()
}

/// Derived from lives and solved clues; losing takes precedence
pub fn outcome(lives: u8, solved: usize, total: usize) -> GameOutcome {
    if lives == 0 {
        GameOutcome::Lost
    } else if total > 0 && solved >= total {
        GameOutcome::Won
    } else {
        GameOutcome::InProgress
    }
}

/// Fires the win signal once per round
#[derive(Debug, Default)]
pub struct WinMonitor {
    fired: bool,
}

impl WinMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once: the first time every non-empty clue is solved
    /// while the game is still running.
    pub fn check(&mut self, puzzle: &Puzzle, solved: &BTreeSet<usize>, is_game_over: bool) -> bool {
        if self.fired || is_game_over {
            return false;
        }

        let total = puzzle.non_empty_clue_count();
        if total == 0 || solved.len() != total {
            return false;
        }

        info!("All {} clues solved for {}", total, puzzle.date);
        self.fired = true;
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn reset(&mut self) {
        self.fired = false;
    }
}
