use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{GameMessage, WordType};

pub type RoundId = Uuid;

pub const VOWELS: [char; 5] = ['A', 'E', 'I', 'O', 'U'];

/// Derived round result; recomputed from lives and solved clues, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameOutcome {
    InProgress,
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterKind {
    Vowel,
    Consonant,
}

impl LetterKind {
    /// Classify an ASCII letter; anything else is not a playable letter
    pub fn of(letter: char) -> Option<Self> {
        if !letter.is_ascii_alphabetic() {
            return None;
        }
        if VOWELS.contains(&letter.to_ascii_uppercase()) {
            Some(LetterKind::Vowel)
        } else {
            Some(LetterKind::Consonant)
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterKind::Vowel => "vowel",
            LetterKind::Consonant => "consonant",
        }
    }
}

/// Keyboard key colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum KeyStatus {
    Unused,         // Gray - letter is in none of the clues
    StillAvailable, // Yellow - some occurrence still unplaced
    UsedUp,         // Gray - every occurrence placed
}

/// Result of submitting a filled clue word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SubmitOutcome {
    Ignored,
    NotAWord,
    Solved,
    PartiallyCorrect { verified_positions: Vec<usize> },
    Incorrect,
}

impl SubmitOutcome {
    pub fn costs_life(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::PartiallyCorrect { .. } | SubmitOutcome::Incorrect
        )
    }
}

/// Per-clue view that never exposes the target word
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClueView {
    pub word_type: WordType,
    pub number: u8,
    pub word_length: usize,
    pub letters: Vec<Option<char>>,
    pub verified_positions: Vec<usize>,
    pub revealed_positions: Vec<usize>, // shown after a loss, never typed
    pub is_complete: bool,
}

/// Safe snapshot of a round for the front-end
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundView {
    pub id: RoundId,
    pub date: String,
    pub lives: u8,
    pub max_lives: u8,
    pub outcome: GameOutcome,
    pub starting_letters: String,
    pub has_started: bool,
    pub hints_enabled: bool,
    pub clues: Vec<ClueView>,
    pub message: Option<GameMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_kind_classification() {
        assert_eq!(LetterKind::of('a'), Some(LetterKind::Vowel));
        assert_eq!(LetterKind::of('U'), Some(LetterKind::Vowel));
        assert_eq!(LetterKind::of('Y'), Some(LetterKind::Consonant));
        assert_eq!(LetterKind::of('7'), None);
        assert_eq!(LetterKind::of(' '), None);
    }

    #[test]
    fn test_outcome_terminality() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Won.is_terminal());
        assert!(GameOutcome::Lost.is_terminal());
    }

    #[test]
    fn test_only_wrong_answers_cost_a_life() {
        assert!(SubmitOutcome::Incorrect.costs_life());
        assert!(
            SubmitOutcome::PartiallyCorrect {
                verified_positions: vec![0]
            }
            .costs_life()
        );
        assert!(!SubmitOutcome::NotAWord.costs_life());
        assert!(!SubmitOutcome::Solved.costs_life());
        assert!(!SubmitOutcome::Ignored.costs_life());
    }
}
