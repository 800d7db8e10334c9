use std::env;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub schedule_path: String,
    pub word_list_path: String,
    pub word_pool_path: String,
    pub used_words_path: String,
    pub generate_days: u32, // puzzles the generator adds per run
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            schedule_path: env::var("PUZZLE_SCHEDULE_PATH")
                .unwrap_or_else(|_| "./data/daily_puzzles.json".to_string()),
            word_list_path: env::var("WORD_LIST_PATH")
                .unwrap_or_else(|_| "./data/words.txt".to_string()),
            word_pool_path: env::var("WORD_POOL_PATH")
                .unwrap_or_else(|_| "./data/daily_words_tagged.json".to_string()),
            used_words_path: env::var("USED_WORDS_PATH")
                .unwrap_or_else(|_| "./data/used_words.json".to_string()),
            generate_days: parse_var("GENERATE_DAYS", 1)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_uses_default() {
        let port: u16 = parse_var("QIYAAS_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_invalid_variable_is_reported() {
        // SAFETY: the variable name is unique to this test
        unsafe { env::set_var("QIYAAS_TEST_BAD_PORT", "eighty") };
        let err = parse_var::<u16>("QIYAAS_TEST_BAD_PORT", 8080).unwrap_err();
        assert_eq!(err.to_string(), "Invalid QIYAAS_TEST_BAD_PORT: \"eighty\"");
        unsafe { env::remove_var("QIYAAS_TEST_BAD_PORT") };
    }
}
