use std::env;
use std::str::FromStr;
use std::time::Duration;

use qiyaas_types::{GameError, LetterKind};
use tracing::warn;

/// Player-facing message strings
#[derive(Debug, Clone)]
pub struct Messages {
    pub letter_already_selected: String,
    pub only_one_vowel: String,
    pub only_three_consonants: String,
    pub max_letters_reached: String,
    pub no_selected_letters: String,
    pub no_starting_letters_match: String,
    pub additional_letter_already_selected: String, // {type}
    pub additional_letter_wrong_type: String,       // {expected}
    pub additional_letter_already_used: String,
    pub word_not_valid: String,
    pub word_not_complete: String,
    pub word_correct: String,
    pub word_incorrect: String,
    pub game_loss: String,
    pub game_win: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            letter_already_selected: "Letter already selected!".to_string(),
            only_one_vowel: "Only 1 vowel allowed!".to_string(),
            only_three_consonants: "Only 3 consonants allowed!".to_string(),
            max_letters_reached: "Only 4 starting letters allowed!".to_string(),
            no_selected_letters: "Please select 4 starting letters first!".to_string(),
            no_starting_letters_match: "No starting letters match any clues!".to_string(),
            additional_letter_already_selected: "You've already selected an additional {type}"
                .to_string(),
            additional_letter_wrong_type: "Please select a {expected}!".to_string(),
            additional_letter_already_used: "This letter is already in use!".to_string(),
            word_not_valid: "Not a playable word. Try again.".to_string(),
            word_not_complete: "Please enter a complete word.".to_string(),
            word_correct: "Correct!".to_string(),
            word_incorrect: "Incorrect.".to_string(),
            game_loss: "Next Time...".to_string(),
            game_win: "Well Done!".to_string(),
        }
    }
}

impl Messages {
    /// Player-facing text for a rejected action, if it has one
    pub fn for_error(&self, error: &GameError) -> Option<String> {
        let text = match error {
            GameError::LetterAlreadySelected { .. } => self.letter_already_selected.clone(),
            GameError::TooManyStartingLetters { .. } => self.max_letters_reached.clone(),
            GameError::TooManyOfKind {
                kind: LetterKind::Vowel,
                ..
            } => self.only_one_vowel.clone(),
            GameError::TooManyOfKind {
                kind: LetterKind::Consonant,
                ..
            } => self.only_three_consonants.clone(),
            GameError::StartingLettersIncomplete { .. } => self.no_selected_letters.clone(),
            GameError::AdditionalLetterAlreadyChosen { kind } => self
                .additional_letter_already_selected
                .replace("{type}", kind.as_str()),
            GameError::AdditionalLetterWrongKind { expected } => {
                let expected = match expected {
                    LetterKind::Vowel => "vowel (A, E, I, O, U)",
                    LetterKind::Consonant => "consonant",
                };
                self.additional_letter_wrong_type
                    .replace("{expected}", expected)
            }
            GameError::LetterAlreadyUsed { .. } => self.additional_letter_already_used.clone(),
            _ => return None,
        };
        Some(text)
    }
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_lives: u8,
    pub starting_letter_count: usize,
    pub max_starting_vowels: usize,
    pub max_starting_consonants: usize,
    pub starting_letter_settle: Duration, // before the no-match penalty lands
    pub keyboard_debounce: Duration,
    pub hint_fade_in: Duration,
    pub hint_fade_out: Duration,
    pub loss_reveal_delay: Duration, // between the loss and showing the answers
    pub messages: Messages,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_lives: 5,
            starting_letter_count: 4,
            max_starting_vowels: 1,
            max_starting_consonants: 3,
            starting_letter_settle: Duration::from_millis(300),
            keyboard_debounce: Duration::from_millis(50),
            hint_fade_in: Duration::from_millis(10),
            hint_fade_out: Duration::from_millis(400),
            loss_reveal_delay: Duration::from_millis(3000),
            messages: Messages::default(),
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `QIYAAS_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            max_lives: env_or("QIYAAS_MAX_LIVES", defaults.max_lives),
            starting_letter_count: env_or(
                "QIYAAS_STARTING_LETTERS",
                defaults.starting_letter_count,
            ),
            max_starting_vowels: env_or("QIYAAS_MAX_VOWELS", defaults.max_starting_vowels),
            max_starting_consonants: env_or(
                "QIYAAS_MAX_CONSONANTS",
                defaults.max_starting_consonants,
            ),
            starting_letter_settle: env_millis_or(
                "QIYAAS_SETTLE_MS",
                defaults.starting_letter_settle,
            ),
            keyboard_debounce: env_millis_or("QIYAAS_KEYBOARD_DEBOUNCE_MS", defaults.keyboard_debounce),
            hint_fade_in: env_millis_or("QIYAAS_HINT_FADE_IN_MS", defaults.hint_fade_in),
            hint_fade_out: env_millis_or("QIYAAS_HINT_FADE_OUT_MS", defaults.hint_fade_out),
            loss_reveal_delay: env_millis_or("QIYAAS_LOSS_REVEAL_MS", defaults.loss_reveal_delay),
            messages: defaults.messages,
        };
        config.sanitized()
    }

    /// Replace values no round could be played with
    fn sanitized(mut self) -> Self {
        if self.max_lives == 0 {
            let lives = Self::default().max_lives;
            warn!("max_lives must be at least 1, using {}", lives);
            self.max_lives = lives;
        }

        let reachable = self.max_starting_vowels + self.max_starting_consonants;
        if self.starting_letter_count > reachable {
            warn!(
                "starting_letter_count {} exceeds {} vowels + {} consonants, clamping",
                self.starting_letter_count, self.max_starting_vowels, self.max_starting_consonants
            );
            self.starting_letter_count = reachable;
        }
        if self.starting_letter_count == 0 {
            warn!("starting_letter_count must be at least 1, using defaults");
            let defaults = Self::default();
            self.starting_letter_count = defaults.starting_letter_count;
            self.max_starting_vowels = defaults.max_starting_vowels;
            self.max_starting_consonants = defaults.max_starting_consonants;
        }

        self
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn env_millis_or(key: &str, default: Duration) -> Duration {
    let millis = env_or(key, default.as_millis() as u64);
    Duration::from_millis(millis)
}
