#![allow(dead_code)]

use qiyaas_core::{GameConfig, GameEvent, GameEventHandler, Round, WordValidator};
use qiyaas_types::{Puzzle, PuzzleClue, RuleKind, SubmitOutcome, WordType};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Creates a test WordValidator with a known set of words
pub fn create_test_validator() -> Arc<WordValidator> {
    let word_list = "honey\nmoney\narrive\nsmart\nstart\nheart\nbee\nsee\ntea\n# comment\nstone";
    Arc::new(WordValidator::from_word_list(word_list))
}

/// HONEY / ARRIVE / SMART
pub fn create_standard_puzzle() -> Puzzle {
    Puzzle::new(
        "2025-12-07",
        vec![
            PuzzleClue::new(WordType::Noun, "honey", RuleKind::AlphabetRule, 8),
            PuzzleClue::new(WordType::Verb, "arrive", RuleKind::LengthRule, 6),
            PuzzleClue::new(WordType::Adjective, "smart", RuleKind::NumberRule, 6),
        ],
    )
}

/// BEE / ARRIVE / SMART, with a three letter noun
pub fn create_short_word_puzzle() -> Puzzle {
    Puzzle::new(
        "2025-12-08",
        vec![
            PuzzleClue::new(WordType::Noun, "bee", RuleKind::AlphabetRule, 2),
            PuzzleClue::new(WordType::Verb, "arrive", RuleKind::LengthRule, 6),
            PuzzleClue::new(WordType::Adjective, "smart", RuleKind::NumberRule, 6),
        ],
    )
}

pub fn create_round(puzzle: Puzzle) -> Round {
    Round::new(puzzle, create_test_validator(), GameConfig::default())
}

pub fn create_round_with_lives(puzzle: Puzzle, max_lives: u8) -> Round {
    let config = GameConfig {
        max_lives,
        ..GameConfig::default()
    };
    Round::new(puzzle, create_test_validator(), config)
}

pub fn create_standard_round() -> Round {
    create_round(create_standard_puzzle())
}

/// Select the given starting letters and start
pub fn start_round(round: &mut Round, letters: &str) {
    for letter in letters.chars() {
        round
            .select_starting_letter(letter)
            .unwrap_or_else(|e| panic!("could not select {}: {}", letter, e));
    }
    round.start().expect("round should start");
}

/// Type a word into a clue; locked positions keep their letter
pub fn type_word(round: &mut Round, clue: usize, word: &str) {
    for (position, letter) in word.chars().enumerate() {
        round.enter_letter(clue, position, letter);
    }
}

pub fn guess(round: &mut Round, clue: usize, word: &str) -> SubmitOutcome {
    type_word(round, clue, word);
    round.submit_word(clue)
}

pub fn wait(round: &mut Round, millis: u64) {
    round.advance(Duration::from_millis(millis));
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn attach(round: &mut Round) -> Self {
        let collector = Self::new();
        round.add_event_handler(Box::new(collector.clone()));
        collector
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn last_event(&self) -> Option<GameEvent> {
        self.events.lock().unwrap().last().cloned()
    }

    pub fn count(&self, check_fn: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}
