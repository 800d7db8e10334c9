use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::LetterKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    NotALetter { input: String },
    LetterAlreadySelected { letter: char },
    TooManyStartingLetters { max: usize },
    TooManyOfKind { kind: LetterKind, max: usize },
    StartingLettersIncomplete { required: usize },
    AlreadyStarted,
    NotStarted,
    AdditionalLetterAlreadyChosen { kind: LetterKind },
    AdditionalLetterWrongKind { expected: LetterKind },
    LetterAlreadyUsed { letter: char },
    ClueNotFound { index: usize },
    RoundOver,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::NotALetter { input } => write!(f, "'{}' is not a letter", input),
            GameError::LetterAlreadySelected { letter } => {
                write!(f, "Letter {} already selected", letter)
            }
            GameError::TooManyStartingLetters { max } => {
                write!(f, "Only {} starting letters allowed", max)
            }
            GameError::TooManyOfKind { kind, max } => {
                write!(f, "Only {} {}(s) allowed", max, kind.as_str())
            }
            GameError::StartingLettersIncomplete { required } => {
                write!(f, "Select {} starting letters first", required)
            }
            GameError::AlreadyStarted => write!(f, "Round already started"),
            GameError::NotStarted => write!(f, "Round has not started"),
            GameError::AdditionalLetterAlreadyChosen { kind } => {
                write!(f, "Additional {} already chosen", kind.as_str())
            }
            GameError::AdditionalLetterWrongKind { expected } => {
                write!(f, "Expected a {}", expected.as_str())
            }
            GameError::LetterAlreadyUsed { letter } => write!(f, "Letter {} already in use", letter),
            GameError::ClueNotFound { index } => write!(f, "No clue at index {}", index),
            GameError::RoundOver => write!(f, "Round is over"),
        }
    }
}

impl std::error::Error for GameError {}
