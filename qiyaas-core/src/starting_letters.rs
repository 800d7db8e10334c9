use qiyaas_types::{GameError, LetterKind};
use tracing::debug;

use crate::GameConfig;

/// True iff some selected letter occurs in some clue word (case-insensitive)
pub fn letters_match_clues(letters: &str, clues: &[String]) -> bool {
    if letters.is_empty() {
        return false;
    }
    let letters = letters.to_uppercase();

    clues.iter().any(|clue| {
        let clue = clue.to_uppercase();
        letters.chars().any(|letter| clue.contains(letter))
    })
}

/// One-shot guard for the no-match life penalty.
///
/// Growing the selection keeps the guard; any other change re-arms it.
/// Each change bumps the generation so pending checks can tell they are stale.
#[derive(Debug, Default)]
pub struct StartingLetterGuard {
    selection: String,
    penalized: bool,
    generation: u64,
}

impl StartingLetterGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the selection changed
    pub fn observe(&mut self, selection: &str) -> bool {
        let selection = selection.to_uppercase();
        if selection == self.selection {
            return false;
        }

        let extends = !self.selection.is_empty() && selection.starts_with(&self.selection);
        if !extends {
            self.penalized = false;
        }

        debug!(
            "Starting letters {:?} -> {:?} (extension: {})",
            self.selection, selection, extends
        );
        self.selection = selection;
        self.generation += 1;
        true
    }

    pub fn should_penalize(&self, matches: bool) -> bool {
        !self.selection.is_empty() && !matches && !self.penalized
    }

    pub fn mark_penalized(&mut self) {
        self.penalized = true;
    }

    pub fn is_penalized(&self) -> bool {
        self.penalized
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }
}

/// Letters picked before the round starts: at most one vowel and three consonants
#[derive(Debug, Clone)]
pub struct StartingLetterSelection {
    letters: Vec<char>,
    max_letters: usize,
    max_vowels: usize,
    max_consonants: usize,
}

impl StartingLetterSelection {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            letters: Vec::with_capacity(config.starting_letter_count),
            max_letters: config.starting_letter_count,
            max_vowels: config.max_starting_vowels,
            max_consonants: config.max_starting_consonants,
        }
    }

    pub fn push(&mut self, letter: char) -> Result<(), GameError> {
        let Some(kind) = LetterKind::of(letter) else {
            return Err(GameError::NotALetter {
                input: letter.to_string(),
            });
        };
        let letter = letter.to_ascii_uppercase();

        if self.letters.contains(&letter) {
            return Err(GameError::LetterAlreadySelected { letter });
        }
        if self.letters.len() >= self.max_letters {
            return Err(GameError::TooManyStartingLetters {
                max: self.max_letters,
            });
        }

        match kind {
            LetterKind::Vowel if self.count(LetterKind::Vowel) >= self.max_vowels => {
                Err(GameError::TooManyOfKind {
                    kind,
                    max: self.max_vowels,
                })
            }
            LetterKind::Consonant if self.count(LetterKind::Consonant) >= self.max_consonants => {
                Err(GameError::TooManyOfKind {
                    kind,
                    max: self.max_consonants,
                })
            }
            _ => {
                self.letters.push(letter);
                Ok(())
            }
        }
    }

    pub fn pop(&mut self) -> Option<char> {
        self.letters.pop()
    }

    pub fn count(&self, kind: LetterKind) -> usize {
        self.letters
            .iter()
            .filter(|letter| LetterKind::of(**letter) == Some(kind))
            .count()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.letters.len() == self.max_letters
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter.to_ascii_uppercase())
    }

    pub fn as_string(&self) -> String {
        self.letters.iter().collect()
    }
}

/// The one extra vowel and one extra consonant granted after the round starts
#[derive(Debug, Clone, Default)]
pub struct AdditionalLetters {
    picks: Vec<(LetterKind, char)>, // in the order they were added
}

impl AdditionalLetters {
    /// Validate a pick for the awaited slot against every letter already in use
    pub fn check(
        &self,
        expected: LetterKind,
        letter: char,
        starting: &StartingLetterSelection,
    ) -> Result<char, GameError> {
        let Some(kind) = LetterKind::of(letter) else {
            return Err(GameError::NotALetter {
                input: letter.to_string(),
            });
        };
        if self.get(expected).is_some() {
            return Err(GameError::AdditionalLetterAlreadyChosen { kind: expected });
        }
        if kind != expected {
            return Err(GameError::AdditionalLetterWrongKind { expected });
        }

        let letter = letter.to_ascii_uppercase();
        if starting.contains(letter) || self.letters().any(|used| used == letter) {
            return Err(GameError::LetterAlreadyUsed { letter });
        }
        Ok(letter)
    }

    pub fn get(&self, kind: LetterKind) -> Option<char> {
        self.picks
            .iter()
            .find(|(picked, _)| *picked == kind)
            .map(|(_, letter)| *letter)
    }

    /// Record a checked pick; a second pick of the same kind is ignored
    pub fn set(&mut self, kind: LetterKind, letter: char) {
        if self.get(kind).is_none() {
            self.picks.push((kind, letter.to_ascii_uppercase()));
        }
    }

    pub fn letters(&self) -> impl Iterator<Item = char> + '_ {
        self.picks.iter().map(|(_, letter)| *letter)
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }
}
