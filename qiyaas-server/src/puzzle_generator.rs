use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use qiyaas_core::clue_number;
use qiyaas_types::{Puzzle, PuzzleClue, RuleKind, WordType};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const WORD_TYPES: [WordType; 3] = [WordType::Noun, WordType::Verb, WordType::Adjective];

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed word file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No unused {length} {} words fit the {rule:?}", .word_type.as_str())]
    NoWordsLeft {
        word_type: WordType,
        length: LengthCategory,
        rule: RuleKind,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCategory {
    Short,  // 3-5 letters
    Medium, // 6-7
    Long,   // 8-9
}

impl LengthCategory {
    pub const ALL: [LengthCategory; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Words outside 3-9 letters are never used
    pub fn for_length(length: usize) -> Option<Self> {
        match length {
            3..=5 => Some(Self::Short),
            6..=7 => Some(Self::Medium),
            8..=9 => Some(Self::Long),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part-of-speech tagged word file: `{"noun": [...], "verb": [...], "adjective": [...]}`
#[derive(Debug, Default, Deserialize)]
pub struct TaggedWords {
    #[serde(default)]
    pub noun: Vec<String>,
    #[serde(default)]
    pub verb: Vec<String>,
    #[serde(default)]
    pub adjective: Vec<String>,
}

#[derive(Debug, Default, Clone)]
struct LengthBuckets {
    short: Vec<String>,
    medium: Vec<String>,
    long: Vec<String>,
}

impl LengthBuckets {
    fn from_words(words: &[String]) -> Self {
        let unique: BTreeSet<String> = words
            .iter()
            .map(|word| word.trim().to_uppercase())
            .filter(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic()))
            .collect();

        let mut buckets = Self::default();
        for word in unique {
            match LengthCategory::for_length(word.len()) {
                Some(LengthCategory::Short) => buckets.short.push(word),
                Some(LengthCategory::Medium) => buckets.medium.push(word),
                Some(LengthCategory::Long) => buckets.long.push(word),
                None => {}
            }
        }
        buckets
    }

    fn get(&self, length: LengthCategory) -> &[String] {
        match length {
            LengthCategory::Short => &self.short,
            LengthCategory::Medium => &self.medium,
            LengthCategory::Long => &self.long,
        }
    }
}

/// Candidate clue words grouped by word type and length
#[derive(Debug, Clone)]
pub struct WordPool {
    nouns: LengthBuckets,
    verbs: LengthBuckets,
    adjectives: LengthBuckets,
}

impl WordPool {
    pub fn new(words: &TaggedWords) -> Self {
        Self {
            nouns: LengthBuckets::from_words(&words.noun),
            verbs: LengthBuckets::from_words(&words.verb),
            adjectives: LengthBuckets::from_words(&words.adjective),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        let words: TaggedWords = serde_json::from_str(json)?;
        Ok(Self::new(&words))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GeneratorError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let pool = Self::from_json(&json)?;

        for word_type in WORD_TYPES {
            let counts: Vec<String> = LengthCategory::ALL
                .iter()
                .map(|&length| format!("{} {}", pool.words(word_type, length).len(), length))
                .collect();
            info!("{} pool: {}", word_type.as_str(), counts.join(", "));
        }
        Ok(pool)
    }

    pub fn words(&self, word_type: WordType, length: LengthCategory) -> &[String] {
        let buckets = match word_type {
            WordType::Noun => &self.nouns,
            WordType::Verb => &self.verbs,
            WordType::Adjective => &self.adjectives,
        };
        buckets.get(length)
    }
}

/// Every word ever put in a puzzle, persisted as `{"used_words": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedWords {
    used_words: BTreeSet<String>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// A missing file means nothing has been used yet
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No used words file at {}", path.display());
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path).map_err(|source| GeneratorError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GeneratorError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| GeneratorError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.used_words.contains(&word.trim().to_uppercase())
    }

    pub fn insert(&mut self, word: &str) -> bool {
        self.used_words.insert(word.trim().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.used_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_words.is_empty()
    }
}

/// Builds one noun/verb/adjective puzzle per date, never repeating a word.
///
/// The random choices are seeded from the date, so the same date, pool and
/// used words always give the same puzzle.
#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    pool: WordPool,
    reroll_chance: f64,
}

impl PuzzleGenerator {
    pub fn new(pool: WordPool) -> Self {
        Self {
            pool,
            reroll_chance: 0.5,
        }
    }

    /// Odds of re-picking the last word when two clues share a number
    pub fn with_reroll_chance(mut self, chance: f64) -> Self {
        self.reroll_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn generate(&self, date: NaiveDate, used: &mut UsedWords) -> Result<Puzzle, GeneratorError> {
        let mut rng = StdRng::seed_from_u64(date.num_days_from_ce() as u64);

        let mut rules = [RuleKind::LengthRule, RuleKind::AlphabetRule, RuleKind::NumberRule];
        rules.shuffle(&mut rng);
        let mut lengths = LengthCategory::ALL;
        lengths.shuffle(&mut rng);

        let mut clues = Vec::with_capacity(WORD_TYPES.len());
        for ((word_type, rule), length) in WORD_TYPES.into_iter().zip(rules).zip(lengths) {
            let clue = self.pick_clue(&mut rng, word_type, length, rule, used, &clues)?;
            clues.push(clue);
        }

        let numbers: BTreeSet<u8> = clues.iter().map(|clue| clue.number).collect();
        if numbers.len() < clues.len() && rng.random::<f64>() < self.reroll_chance {
            let last = clues.len() - 1;
            match self.pick_clue(&mut rng, WORD_TYPES[last], lengths[last], rules[last], used, &clues) {
                Ok(clue) => {
                    debug!("Rerolled {} to {} for distinct numbers", clues[last].word, clue.word);
                    clues[last] = clue;
                }
                Err(e) => debug!("Keeping {}: {}", clues[last].word, e),
            }
        }

        for clue in &clues {
            used.insert(&clue.word);
        }
        let puzzle = Puzzle::new(date.format("%Y-%m-%d").to_string(), clues);
        info!("Generated puzzle for {}: {:?}", puzzle.date, puzzle.clue_words());
        Ok(puzzle)
    }

    /// Consecutive puzzles from `start`; dates in `skip` are left out
    pub fn generate_days(
        &self,
        start: NaiveDate,
        days: u32,
        skip: &BTreeSet<String>,
        used: &mut UsedWords,
    ) -> Result<Vec<Puzzle>, GeneratorError> {
        let mut puzzles = Vec::new();
        for date in start.iter_days().take(days as usize) {
            let key = date.format("%Y-%m-%d").to_string();
            if skip.contains(&key) {
                warn!("Puzzle for {} already exists, skipping", key);
                continue;
            }
            puzzles.push(self.generate(date, used)?);
        }
        Ok(puzzles)
    }

    fn pick_clue(
        &self,
        rng: &mut StdRng,
        word_type: WordType,
        length: LengthCategory,
        rule: RuleKind,
        used: &UsedWords,
        picked: &[PuzzleClue],
    ) -> Result<PuzzleClue, GeneratorError> {
        let candidates: Vec<(&str, u8)> = self
            .pool
            .words(word_type, length)
            .iter()
            .filter(|word| !used.contains(word) && !picked.iter().any(|clue| clue.word == **word))
            .filter_map(|word| clue_number(word, rule).map(|number| (word.as_str(), number)))
            .collect();

        let &(word, number) = candidates.choose(rng).ok_or(GeneratorError::NoWordsLeft {
            word_type,
            length,
            rule,
        })?;
        Ok(PuzzleClue::new(word_type, word, rule, number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qiyaas_core::{clue_matches_rule, validate_puzzle};
    use std::collections::HashSet;

    const WORDS: &str = r#"{
        "noun": ["eagle", "frost", "ember", "flame", "apple", "ocean", "maple",
                 "engine", "forest", "editor", "falcon", "basket", "temple", "mirror",
                 "elephant", "fountain", "eventide", "frontier", "hospital", "notebook", "mountain"],
        "verb": ["enter", "fetch", "evade", "float", "begin", "throw", "march",
                 "escape", "finish", "expand", "follow", "decide", "settle", "mutter",
                 "evaluate", "forecast", "exercise", "flourish", "generate", "navigate", "memorize"],
        "adjective": ["eager", "fancy", "early", "fresh", "brave", "sharp", "merry",
                      "entire", "famous", "exotic", "formal", "honest", "tender", "modest",
                      "exciting", "fearless", "enormous", "fragrant", "cheerful", "ordinary", "magnetic"]
    }"#;

    fn generator() -> PuzzleGenerator {
        PuzzleGenerator::new(WordPool::from_json(WORDS).unwrap())
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_pool_buckets_by_length() {
        let pool = WordPool::from_json(r#"{"noun": ["ox", "Honey", "honey", "harbor", "notebook", "blackboards", "x-ray"]}"#)
            .unwrap();

        assert_eq!(pool.words(WordType::Noun, LengthCategory::Short), ["HONEY"]);
        assert_eq!(pool.words(WordType::Noun, LengthCategory::Medium), ["HARBOR"]);
        assert_eq!(pool.words(WordType::Noun, LengthCategory::Long), ["NOTEBOOK"]);
        assert!(pool.words(WordType::Verb, LengthCategory::Short).is_empty());
    }

    #[test]
    fn test_puzzle_follows_rules() {
        let mut used = UsedWords::new();
        let puzzle = generator().generate(day("2026-01-05"), &mut used).unwrap();

        assert_eq!(puzzle.date, "2026-01-05");
        assert!(validate_puzzle(&puzzle).is_ok());
        assert!(puzzle.clues.iter().all(clue_matches_rule));

        let types: Vec<WordType> = puzzle.clues.iter().map(|clue| clue.word_type).collect();
        assert_eq!(types, WORD_TYPES);

        let rules: HashSet<Option<RuleKind>> = puzzle.clues.iter().map(|c| c.rule).collect();
        assert_eq!(rules.len(), 3);
        let lengths: BTreeSet<&str> = puzzle.clues.iter().map(|c| c.length_category.as_str()).collect();
        assert_eq!(lengths.len(), 3);

        assert_eq!(used.len(), 3);
        assert!(puzzle.clue_words().iter().all(|word| used.contains(word)));
    }

    #[test]
    fn test_same_date_same_puzzle() {
        let first = generator().generate(day("2026-02-14"), &mut UsedWords::new()).unwrap();
        let second = generator().generate(day("2026-02-14"), &mut UsedWords::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_words_are_never_reused() {
        let generator = generator().with_reroll_chance(1.0);
        let mut used = UsedWords::new();
        let puzzles = generator
            .generate_days(day("2026-03-01"), 3, &BTreeSet::new(), &mut used)
            .unwrap();

        let words: Vec<String> = puzzles.iter().flat_map(|p| p.clue_words()).collect();
        let unique: BTreeSet<&String> = words.iter().collect();
        assert_eq!(words.len(), 9);
        assert_eq!(unique.len(), 9);
        assert_eq!(used.len(), 9);
    }

    #[test]
    fn test_scheduled_dates_are_skipped() {
        let skip = BTreeSet::from(["2026-03-02".to_string()]);
        let puzzles = generator()
            .generate_days(day("2026-03-01"), 3, &skip, &mut UsedWords::new())
            .unwrap();

        let dates: Vec<&str> = puzzles.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-03-01", "2026-03-03"]);
    }

    #[test]
    fn test_exhausted_pool_is_an_error() {
        let generator = generator();
        let mut used = UsedWords::new();
        let result = (0..30)
            .map(|offset| generator.generate(day("2026-04-01") + chrono::Days::new(offset), &mut used))
            .find(Result::is_err);

        assert!(matches!(result, Some(Err(GeneratorError::NoWordsLeft { .. }))));
    }

    #[test]
    fn test_used_words_file_round_trip() {
        let path = std::env::temp_dir().join(format!("qiyaas-used-{}.json", std::process::id()));
        assert!(UsedWords::load(&path).unwrap().is_empty());

        let mut used = UsedWords::new();
        used.insert("honey");
        used.save(&path).unwrap();

        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"used_words\""));
        let loaded = UsedWords::load(&path).unwrap();
        assert!(loaded.contains("HONEY"));
        std::fs::remove_file(&path).unwrap();
    }
}
