mod common;

use common::*;
use qiyaas_core::{
    ClueMatcher, MatchUpdate, StartingLetterGuard, WordCheck, active_clues, get_solved_clues,
    hint_rule, hint_table, is_clue_complete, letters_match_clues,
};
use std::collections::BTreeSet;

#[test]
fn test_hint_table_covers_every_digit() {
    assert_eq!(hint_table().len(), 9);
    for digit in 1..=9 {
        let rule = hint_rule(digit).unwrap();
        assert!(rule.alphabet_letter.is_ascii_uppercase());
        assert!(rule.number_letter().is_some());
    }
    let five = hint_rule(5).unwrap();
    assert_eq!((five.alphabet_letter, five.number_letter()), ('E', Some('F')));
}

#[test]
fn test_revealing_honey_solves_only_the_noun() {
    let puzzle = create_standard_puzzle();
    let revealed: BTreeSet<char> = "HONEY".chars().collect();

    assert!(is_clue_complete("HONEY", &revealed));
    assert!(!is_clue_complete("ARRIVE", &revealed));
    assert!(!is_clue_complete("SMART", &revealed));
    assert_eq!(get_solved_clues(&puzzle, &revealed), BTreeSet::from([0]));
}

#[test]
fn test_validation_is_idempotent() {
    let validator = create_test_validator();
    for word in ["honey", "  HONEY ", "qonez", ""] {
        let first = validator.validate(word);
        let second = validator.validate(word);
        assert_eq!(first, second);
    }
    assert_eq!(validator.validate(" Honey"), WordCheck::Valid);
}

#[test]
fn test_clue_matcher_returns_all_clues() {
    let puzzle = create_standard_puzzle();
    assert_eq!(active_clues(&puzzle, ""), vec!["HONEY", "ARRIVE", "SMART"]);

    let mut matcher = ClueMatcher::new();
    assert!(matches!(
        matcher.update(&puzzle, "ERST"),
        MatchUpdate::NewRound { .. }
    ));
    assert!(matches!(
        matcher.update(&puzzle, "ERSTO"),
        MatchUpdate::Extended { .. }
    ));
}

#[test]
fn test_penalty_guard_scenario() {
    let clues = active_clues(&create_standard_puzzle(), "");
    let mut guard = StartingLetterGuard::new();

    guard.observe("BC");
    assert!(!letters_match_clues("BC", &clues));
    assert!(guard.should_penalize(false));
    guard.mark_penalized();

    guard.observe("BCD");
    assert!(!guard.should_penalize(letters_match_clues("BCD", &clues)));

    guard.observe("DG");
    assert!(guard.should_penalize(letters_match_clues("DG", &clues)));
}
