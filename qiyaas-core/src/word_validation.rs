use std::collections::HashSet;

use anyhow::{Context, Result};

/// Outcome of checking a guess against the dictionary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordCheck {
    Valid,
    NotInDictionary,
    Incomplete { message: String },
}

impl WordCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, WordCheck::Valid)
    }
}

pub struct WordValidator {
    valid_words: HashSet<String>,
}

impl WordValidator {
    /// Create a new word validator from a word list
    pub fn from_word_list(word_list: &str) -> Self {
        let valid_words = word_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(normalize_word)
            .collect();

        Self { valid_words }
    }

    /// Load a newline separated word list from disk
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path))?;
        Ok(Self::from_word_list(&contents))
    }

    /// Normalize then look the guess up; same input, same answer
    pub fn validate(&self, word: &str) -> WordCheck {
        let word = normalize_word(word);
        if word.is_empty() {
            return WordCheck::Incomplete {
                message: "Please enter a complete word.".to_string(),
            };
        }

        if self.valid_words.contains(&word) {
            WordCheck::Valid
        } else {
            WordCheck::NotInDictionary
        }
    }

    /// Check if a word is valid for the game
    pub fn is_valid_word(&self, word: &str) -> bool {
        self.validate(word).is_valid()
    }

    /// Check if word contains only alphabetic characters
    pub fn is_alphabetic(&self, word: &str) -> bool {
        word.chars().all(|c| c.is_ascii_alphabetic())
    }

    pub fn len(&self) -> usize {
        self.valid_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valid_words.is_empty()
    }
}

pub fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_validator() {
        let word_list = "honey\narrive\nsmart\n# comment\n\nbee\nbananas";
        let validator = WordValidator::from_word_list(word_list);

        assert!(validator.is_valid_word("honey"));
        assert!(validator.is_valid_word("HONEY"));
        assert!(validator.is_valid_word("  Smart "));
        assert!(validator.is_valid_word("bee"));
        assert!(validator.is_valid_word("bananas"));
        assert!(!validator.is_valid_word("hony"));
        assert_eq!(validator.len(), 5);
    }

    #[test]
    fn test_empty_guess_is_incomplete() {
        let validator = WordValidator::from_word_list("honey");

        for input in ["", "   ", "\t\n"] {
            match validator.validate(input) {
                WordCheck::Incomplete { message } => {
                    assert_eq!(message, "Please enter a complete word.")
                }
                other => panic!("expected Incomplete, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = WordValidator::from_word_list("honey\nsmart");

        for input in ["honey", " sMaRt", "zzzzz", ""] {
            assert_eq!(validator.validate(input), validator.validate(input));
            let normalized = normalize_word(input);
            assert_eq!(validator.validate(input), validator.validate(&normalized));
        }
    }

    #[test]
    fn test_comments_and_whitespace() {
        let word_list = "# This is a comment\nvalid\n   \n\t# Another comment\n  spaced  \n\n";
        let validator = WordValidator::from_word_list(word_list);

        assert!(validator.is_valid_word("valid"));
        assert!(validator.is_valid_word("spaced"));
        assert!(!validator.is_valid_word("# This is a comment"));
        assert_eq!(validator.len(), 2);
    }

    #[test]
    fn test_alphabetic_check() {
        let validator = WordValidator::from_word_list("test");
        assert!(validator.is_alphabetic("hello"));
        assert!(!validator.is_alphabetic("hello123"));
        assert!(!validator.is_alphabetic("hello-world"));
        assert!(!validator.is_alphabetic("test word"));
    }

    #[test]
    fn test_empty_word_list() {
        let validator = WordValidator::from_word_list("");
        assert!(validator.is_empty());
        assert_eq!(validator.validate("hello"), WordCheck::NotInDictionary);
    }

    #[test]
    fn test_missing_word_file() {
        let result = WordValidator::from_file("/definitely/not/here/words.txt");
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("Failed to read word list"));
    }
}
