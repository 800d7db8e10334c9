use std::collections::{BTreeMap, BTreeSet};

use qiyaas_types::Puzzle;
use tracing::debug;

/// Every clue word, in clue order. The starting letters do not filter:
/// all clues stay playable whatever was selected.
pub fn active_clues(puzzle: &Puzzle, _starting_letters: &str) -> Vec<String> {
    puzzle.clue_words()
}

/// Positions of `word` whose letter is among `letters`, pre-filled
pub fn initialize_word_inputs(word: &str, letters: &BTreeSet<char>) -> BTreeMap<usize, char> {
    word.trim()
        .to_uppercase()
        .chars()
        .enumerate()
        .filter(|(_, letter)| letters.contains(letter))
        .collect()
}

pub fn letter_set(letters: &str) -> BTreeSet<char> {
    letters
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchUpdate {
    /// First selection, or one that does not extend the previous: inputs start over
    NewRound { clues: Vec<String> },
    /// The previous selection plus more letters: progress is kept
    Extended { added: BTreeSet<char> },
    Unchanged,
}

/// Remembers the last selection so growing it never erases progress
#[derive(Debug, Default)]
pub struct ClueMatcher {
    last_letters: Option<String>,
}

impl ClueMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, puzzle: &Puzzle, letters: &str) -> MatchUpdate {
        let letters = letters.to_uppercase();

        let update = match self.last_letters.as_deref() {
            Some(previous) if previous == letters => MatchUpdate::Unchanged,
            Some(previous) if !previous.is_empty() && letters.starts_with(previous) => {
                let added = letter_set(&letters[previous.len()..]);
                debug!("Selection extended by {:?}", added);
                MatchUpdate::Extended { added }
            }
            _ => {
                debug!("New selection {:?}", letters);
                MatchUpdate::NewRound {
                    clues: active_clues(puzzle, &letters),
                }
            }
        };

        self.last_letters = Some(letters);
        update
    }

    pub fn last_letters(&self) -> Option<&str> {
        self.last_letters.as_deref()
    }

    pub fn reset(&mut self) {
        self.last_letters = None;
    }
}
