use std::collections::{BTreeMap, BTreeSet};

use qiyaas_types::KeyStatus;
use tracing::{debug, warn};

use crate::initialize_word_inputs;

/// Keyed `"clue{index}-pos{position}"`
pub type KeyboardProjection = BTreeMap<String, char>;

pub fn position_key(clue_index: usize, position: usize) -> String {
    format!("clue{}-pos{}", clue_index, position)
}

/// Letters typed into one clue word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordInputState {
    target: Vec<char>,
    entries: BTreeMap<usize, char>,
    verified: BTreeSet<usize>,
    prefilled: BTreeSet<usize>,
    revealed: BTreeSet<usize>, // filled in after a loss
}

impl WordInputState {
    pub fn new(word: &str) -> Self {
        Self {
            target: word.trim().to_uppercase().chars().collect(),
            ..Self::default()
        }
    }

    /// New state with every position whose target letter is available already filled in
    pub fn with_prefill(word: &str, available: &BTreeSet<char>) -> Self {
        let mut state = Self::new(word);
        state.prefill(available);
        state
    }

    pub fn word(&self) -> String {
        self.target.iter().collect()
    }

    pub fn word_length(&self) -> usize {
        self.target.len()
    }

    pub fn target_letter(&self, position: usize) -> Option<char> {
        self.target.get(position).copied()
    }

    pub fn entries(&self) -> &BTreeMap<usize, char> {
        &self.entries
    }

    pub fn entry(&self, position: usize) -> Option<char> {
        self.entries.get(&position).copied()
    }

    pub fn verified_positions(&self) -> &BTreeSet<usize> {
        &self.verified
    }

    pub fn is_verified(&self, position: usize) -> bool {
        self.verified.contains(&position)
    }

    pub fn is_prefilled(&self, position: usize) -> bool {
        self.prefilled.contains(&position)
    }

    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed.contains(&position)
    }

    pub fn revealed_positions(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    /// Every position verified; an empty word is never complete
    pub fn is_complete(&self) -> bool {
        !self.target.is_empty() && self.verified.len() == self.target.len()
    }

    /// Every position holds a letter, right or wrong
    pub fn is_filled(&self) -> bool {
        !self.target.is_empty() && self.entries.len() == self.target.len()
    }

    /// Empty positions, and user-typed ones, may take a new letter
    pub fn can_replace_position(&self, position: usize) -> bool {
        position < self.target.len()
            && !self.is_verified(position)
            && !self.is_prefilled(position)
            && !self.is_revealed(position)
    }

    /// Record a tentative letter. Returns false when the write was ignored.
    pub fn set_letter(&mut self, position: usize, letter: char) -> bool {
        if position >= self.target.len() {
            warn!(
                "Ignoring letter at position {} beyond word length {}",
                position,
                self.target.len()
            );
            return false;
        }
        if !letter.is_ascii_alphabetic() || !self.can_replace_position(position) {
            return false;
        }

        self.entries.insert(position, letter.to_ascii_uppercase());
        true
    }

    pub fn clear_letter(&mut self, position: usize) -> bool {
        if !self.can_replace_position(position) {
            return false;
        }
        self.entries.remove(&position).is_some()
    }

    /// Fill and lock every position whose target letter is available.
    /// Returns the positions that were newly filled.
    pub fn prefill(&mut self, available: &BTreeSet<char>) -> Vec<usize> {
        let mut filled = Vec::new();

        for (position, letter) in initialize_word_inputs(&self.word(), available) {
            if self.prefilled.contains(&position) {
                continue;
            }
            if self.entries.insert(position, letter) != Some(letter) {
                filled.push(position);
            }
            self.prefilled.insert(position);
        }

        filled
    }

    /// Lock a position if its entry matches the target
    pub fn verify_position(&mut self, position: usize) -> bool {
        match (self.entry(position), self.target_letter(position)) {
            (Some(entry), Some(target)) if entry == target => self.verified.insert(position),
            _ => false,
        }
    }

    /// Mark the whole word solved
    pub fn verify_all(&mut self) {
        for (position, &letter) in self.target.iter().enumerate() {
            self.entries.insert(position, letter);
            self.verified.insert(position);
        }
    }

    /// Positions where the current entry equals the target letter
    pub fn correct_positions(&self) -> BTreeSet<usize> {
        self.entries
            .iter()
            .filter(|(position, letter)| self.target_letter(**position) == Some(**letter))
            .map(|(position, _)| *position)
            .collect()
    }

    /// Drop every letter that is neither pre-filled, verified nor revealed
    pub fn reset_unlocked(&mut self) {
        self.entries.retain(|position, _| {
            self.prefilled.contains(position)
                || self.verified.contains(position)
                || self.revealed.contains(position)
        });
    }

    /// Show the answer: every position not already locked takes its target
    /// letter and is locked as revealed. Returns the revealed positions.
    pub fn reveal_remaining(&mut self) -> Vec<usize> {
        let mut revealed = Vec::new();

        for (position, &letter) in self.target.iter().enumerate() {
            if self.is_verified(position) || self.is_prefilled(position) || self.is_revealed(position) {
                continue;
            }
            self.entries.insert(position, letter);
            self.revealed.insert(position);
            revealed.push(position);
        }

        revealed
    }

    /// The word as currently typed, if every position is filled
    pub fn assembled_word(&self) -> Option<String> {
        if !self.is_filled() {
            return None;
        }
        Some(self.entries.values().collect())
    }

    /// First empty position after `from` (or from the start when `None`)
    pub fn find_next_empty_position(&self, from: Option<usize>) -> Option<usize> {
        let start = from.map_or(0, |position| position + 1);
        (start..self.target.len()).find(|position| !self.entries.contains_key(position))
    }

    pub fn find_previous_empty_position(&self, from: usize) -> Option<usize> {
        (0..from.min(self.target.len()))
            .rev()
            .find(|position| !self.entries.contains_key(position))
    }
}

/// Per-clue inputs plus the global guessed-letter history
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    clues: Vec<WordInputState>,
    guessed_letters: Vec<char>, // insertion ordered, no duplicates
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// One fresh state per clue word, pre-filled with the available letters
    pub fn initialize(&mut self, words: &[String], available: &BTreeSet<char>) {
        self.clues = words
            .iter()
            .map(|word| WordInputState::with_prefill(word, available))
            .collect();
    }

    /// Pre-fill newly available letters without touching existing progress
    pub fn extend_prefill(&mut self, available: &BTreeSet<char>) -> usize {
        self.clues
            .iter_mut()
            .filter(|state| !state.is_complete())
            .map(|state| state.prefill(available).len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.clues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clues.is_empty()
    }

    pub fn clue(&self, index: usize) -> Option<&WordInputState> {
        self.clues.get(index)
    }

    pub fn clue_mut(&mut self, index: usize) -> Option<&mut WordInputState> {
        self.clues.get_mut(index)
    }

    pub fn clues(&self) -> &[WordInputState] {
        &self.clues
    }

    pub fn set_letter(&mut self, clue_index: usize, position: usize, letter: char) -> bool {
        let Some(state) = self.clues.get_mut(clue_index) else {
            warn!("Ignoring letter for unknown clue {}", clue_index);
            return false;
        };
        let changed = state.set_letter(position, letter);
        if changed {
            debug!("clue {} position {} <- {}", clue_index, position, letter);
        }
        changed
    }

    pub fn clear_letter(&mut self, clue_index: usize, position: usize) -> bool {
        self.clues
            .get_mut(clue_index)
            .is_some_and(|state| state.clear_letter(position))
    }

    pub fn verify_position(&mut self, clue_index: usize, position: usize) -> bool {
        self.clues
            .get_mut(clue_index)
            .is_some_and(|state| state.verify_position(position))
    }

    pub fn verify_all(&mut self, clue_index: usize) {
        if let Some(state) = self.clues.get_mut(clue_index) {
            state.verify_all();
        }
    }

    /// Remember a submitted letter, right or wrong
    pub fn record_guessed_letter(&mut self, letter: char) -> bool {
        if !letter.is_ascii_alphabetic() {
            return false;
        }
        let letter = letter.to_ascii_uppercase();
        if self.guessed_letters.contains(&letter) {
            return false;
        }
        self.guessed_letters.push(letter);
        true
    }

    pub fn record_guessed_word(&mut self, word: &str) {
        for letter in word.chars() {
            self.record_guessed_letter(letter);
        }
    }

    pub fn guessed_letters(&self) -> &[char] {
        &self.guessed_letters
    }

    /// Reveal the answer of every unsolved clue; returns the clues that changed
    pub fn reveal_unsolved(&mut self) -> Vec<usize> {
        self.clues
            .iter_mut()
            .enumerate()
            .filter(|(_, state)| !state.is_complete())
            .filter_map(|(index, state)| (!state.reveal_remaining().is_empty()).then_some(index))
            .collect()
    }

    /// Indices of clues with every position verified
    pub fn completed_clues(&self) -> BTreeSet<usize> {
        self.clues
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_complete())
            .map(|(index, _)| index)
            .collect()
    }

    /// Tentative and verified letters across every clue
    pub fn flatten_for_keyboard(&self) -> KeyboardProjection {
        let mut flattened = KeyboardProjection::new();
        for (clue_index, state) in self.clues.iter().enumerate() {
            for (&position, &letter) in state.entries() {
                flattened.insert(position_key(clue_index, position), letter);
            }
        }
        flattened
    }

    /// Target letters at verified positions, plus `guessed-N` for each guessed letter
    pub fn flatten_verified(&self) -> KeyboardProjection {
        let mut flattened = KeyboardProjection::new();
        for (clue_index, state) in self.clues.iter().enumerate() {
            for &position in state.verified_positions() {
                if let Some(letter) = state.target_letter(position) {
                    flattened.insert(position_key(clue_index, position), letter);
                }
            }
        }
        for (count, &letter) in self.guessed_letters.iter().enumerate() {
            flattened.insert(format!("guessed-{}", count), letter);
        }
        flattened
    }

    /// Keyboard colouring for every tracked letter.
    ///
    /// Available (starting/additional) letters count as placed wherever they
    /// occur; other letters count once per verified position.
    pub fn key_statuses(&self, available: &BTreeSet<char>) -> BTreeMap<char, KeyStatus> {
        let verified = self.flatten_verified();
        let tracked: BTreeSet<char> = available
            .iter()
            .chain(verified.values())
            .copied()
            .collect();

        let mut statuses = BTreeMap::new();
        for letter in tracked {
            let mut needed = 0;
            let mut placed = 0;

            for (clue_index, state) in self.clues.iter().enumerate() {
                let occurrences = state.word().chars().filter(|c| *c == letter).count();
                if occurrences == 0 {
                    continue;
                }
                needed += occurrences;

                let prefix = format!("clue{}-", clue_index);
                placed += verified
                    .iter()
                    .filter(|(key, value)| key.starts_with(&prefix) && **value == letter)
                    .count();
                if available.contains(&letter) {
                    placed += occurrences;
                }
            }

            let status = if needed == 0 {
                KeyStatus::Unused
            } else if placed >= needed {
                KeyStatus::UsedUp
            } else {
                KeyStatus::StillAvailable
            };
            statuses.insert(letter, status);
        }

        statuses
    }
}
