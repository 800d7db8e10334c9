use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of clues in every daily puzzle (noun, verb, adjective)
pub const CLUES_PER_PUZZLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum WordType {
    Noun,
    Verb,
    Adjective,
}

impl WordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordType::Noun => "NOUN",
            WordType::Verb => "VERB",
            WordType::Adjective => "ADJECTIVE",
        }
    }
}

/// Which rule links a clue word to its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    AlphabetRule, // first letter is the nth letter of the alphabet
    NumberRule,   // first letter starts the number's name
    LengthRule,   // word length folded into 1..=9
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PuzzleClue {
    #[serde(rename = "type")]
    pub word_type: WordType,
    pub word: String,
    #[serde(default)]
    pub rule: Option<RuleKind>,
    pub number: u8,
    #[serde(default)]
    pub length_category: String,
    #[serde(default)]
    pub word_length: usize,
}

impl PuzzleClue {
    /// Build a clue, deriving length metadata from the word
    pub fn new(word_type: WordType, word: &str, rule: RuleKind, number: u8) -> Self {
        let word = word.trim().to_uppercase();
        let word_length = word.chars().count();

        Self {
            word_type,
            rule: Some(rule),
            number,
            length_category: length_category_for(word_length).to_string(),
            word_length,
            word,
        }
    }

    /// Placeholder clue used when the daily feed is unavailable
    pub fn empty(word_type: WordType) -> Self {
        Self {
            word_type,
            word: String::new(),
            rule: None,
            number: 0,
            length_category: String::new(),
            word_length: 0,
        }
    }

    /// Upper-cased, trimmed target word
    pub fn normalized_word(&self) -> String {
        self.word.trim().to_uppercase()
    }

    pub fn is_empty(&self) -> bool {
        self.word.trim().is_empty()
    }
}

/// Length bucket used by the puzzle generator
pub fn length_category_for(word_length: usize) -> &'static str {
    match word_length {
        0..=5 => "short",
        6..=7 => "medium",
        _ => "long",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Puzzle {
    pub date: String, // YYYY-MM-DD
    pub clues: Vec<PuzzleClue>,
}

/// What distinguishes one puzzle from another for hint resets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PuzzleIdentity {
    pub date: String,
    pub numbers: Vec<u8>,
}

impl Puzzle {
    pub fn new(date: impl Into<String>, clues: Vec<PuzzleClue>) -> Self {
        Self {
            date: date.into(),
            clues,
        }
    }

    /// Empty-clue puzzle for the given day; a round built on it can never be won
    pub fn fallback(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            clues: vec![
                PuzzleClue::empty(WordType::Noun),
                PuzzleClue::empty(WordType::Verb),
                PuzzleClue::empty(WordType::Adjective),
            ],
        }
    }

    pub fn numbers_for_clue(&self) -> Vec<u8> {
        self.clues.iter().map(|clue| clue.number).collect()
    }

    pub fn identity(&self) -> PuzzleIdentity {
        PuzzleIdentity {
            date: self.date.clone(),
            numbers: self.numbers_for_clue(),
        }
    }

    /// Upper-cased clue words in clue order, empty words included
    pub fn clue_words(&self) -> Vec<String> {
        self.clues.iter().map(PuzzleClue::normalized_word).collect()
    }

    pub fn clue(&self, index: usize) -> Option<&PuzzleClue> {
        self.clues.get(index)
    }

    pub fn non_empty_clue_count(&self) -> usize {
        self.clues.iter().filter(|clue| !clue.is_empty()).count()
    }

    pub fn is_fallback(&self) -> bool {
        self.non_empty_clue_count() == 0
    }
}

/// One row of the digit → hint table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HintRule {
    pub digit: u8,
    pub alphabet_letter: char,
    pub number_word: String,
}

impl HintRule {
    /// First letter of the number's name ("FIVE" → 'F')
    pub fn number_letter(&self) -> Option<char> {
        self.number_word.chars().next()
    }
}
