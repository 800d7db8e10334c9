//! Digit → hint mapping shared by every puzzle.
//!
//! Each clue number 1-9 hints at two letters:
//! - the alphabet rule: the digit-th letter of the alphabet (5 → E)
//! - the number rule: the first letter of the digit's name (5 → FIVE → F)
//!
//! The puzzle generator picks each clue word so that one of these (or the
//! word length, folded into 1..=9) produces the clue number.

use std::sync::LazyLock;

use qiyaas_types::{HintRule, PuzzleClue, RuleKind};

const NUMBER_WORDS: [&str; 9] = [
    "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE",
];

static HINT_TABLE: LazyLock<Vec<HintRule>> = LazyLock::new(|| {
    NUMBER_WORDS
        .iter()
        .enumerate()
        .map(|(i, word)| HintRule {
            digit: i as u8 + 1,
            alphabet_letter: (b'A' + i as u8) as char,
            number_word: word.to_string(),
        })
        .collect()
});

/// All nine rules, ordered by digit
pub fn hint_table() -> &'static [HintRule] {
    &HINT_TABLE
}

/// Rule for a clue digit; 0 (fallback puzzles) and anything above 9 have none
pub fn hint_rule(digit: u8) -> Option<&'static HintRule> {
    if digit == 0 {
        return None;
    }
    HINT_TABLE.get(digit as usize - 1)
}

/// Hint line as displayed next to a clue, e.g. `"= E , F"` for 5
pub fn hint_text(digit: u8) -> Option<String> {
    let rule = hint_rule(digit)?;
    let number_letter = rule.number_letter()?;
    Some(format!("= {} , {}", rule.alphabet_letter, number_letter))
}

/// Split a hint line into its alphabet part and number part
pub fn parse_hint_text(hint: &str) -> (String, String) {
    let clean = hint.trim().trim_start_matches('=').trim();
    let mut parts = clean.splitn(2, ',');

    let alphabet_part = parts.next().unwrap_or_default().trim().to_string();
    let number_part = parts.next().unwrap_or_default().trim().to_string();
    (alphabet_part, number_part)
}

/// Number a word produces under a rule, as the puzzle generator computes it
pub fn clue_number(word: &str, rule: RuleKind) -> Option<u8> {
    let word = word.trim().to_uppercase();
    let first = word.chars().next()?;

    match rule {
        RuleKind::LengthRule => {
            let folded = (word.chars().count() % 9) as u8;
            Some(if folded == 0 { 9 } else { folded })
        }
        RuleKind::AlphabetRule => match first {
            'A'..='I' => Some(first as u8 - b'A' + 1),
            _ => None,
        },
        RuleKind::NumberRule => HINT_TABLE
            .iter()
            .find(|rule| rule.number_letter() == Some(first))
            .map(|rule| rule.digit),
    }
}

/// Whether a clue's number is consistent with its declared rule
pub fn clue_matches_rule(clue: &PuzzleClue) -> bool {
    match clue.rule {
        Some(rule) => clue_number(&clue.word, rule) == Some(clue.number),
        None => false,
    }
}
