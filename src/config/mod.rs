//! Configuration module - environment variable parsing

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::game::{Difficulty, FieldLayout, MatchSettings};
use crate::util::time::unix_millis;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,

    /// Seed for AI decisions and procedural layouts
    pub match_seed: u64,
    /// Peg arrangement used for the match
    pub field_layout: FieldLayout,
    /// AI tier defending the left goal
    pub left_tier: Difficulty,
    /// AI tier defending the right goal
    pub right_tier: Difficulty,

    pub goals_to_win: u32,
    pub max_turns: u32,
    /// Seconds a remote player has to shoot
    pub turn_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: parse_or("LOG_JSON", false)?,

            // Fall back to the clock so unattended runs differ
            match_seed: parse_or("MATCH_SEED", unix_millis())?,
            field_layout: parse_or("FIELD_LAYOUT", FieldLayout::Classic)?,
            left_tier: parse_or("LEFT_TIER", Difficulty::Medium)?,
            right_tier: parse_or("RIGHT_TIER", Difficulty::Hard)?,

            goals_to_win: parse_or("GOALS_TO_WIN", 3)?,
            max_turns: parse_or("MAX_TURNS", 30)?,
            turn_timeout_secs: parse_or("TURN_TIMEOUT_SECS", 30)?,
        })
    }

    pub fn match_settings(&self) -> MatchSettings {
        MatchSettings {
            goals_to_win: self.goals_to_win,
            max_turns: self.max_turns,
            turn_timeout: Duration::from_secs(self.turn_timeout_secs),
        }
    }
}

/// Read and parse `key`, using `default` when it is unset
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_typed_values() {
        assert_eq!(parse_value::<u32>("GOALS_TO_WIN", " 5 ").unwrap(), 5);
        assert!(parse_value::<bool>("LOG_JSON", "true").unwrap());
        assert_eq!(
            parse_value::<Difficulty>("LEFT_TIER", "easy").unwrap(),
            Difficulty::Easy
        );
        assert_eq!(
            parse_value::<FieldLayout>("FIELD_LAYOUT", "scattered").unwrap(),
            FieldLayout::Scattered
        );
    }

    #[test]
    fn reports_bad_values_with_key() {
        let err = parse_value::<u32>("MAX_TURNS", "many").unwrap_err();
        assert!(err.to_string().contains("MAX_TURNS"));
        assert!(matches!(err, ConfigError::Invalid { key: "MAX_TURNS", .. }));
    }

    #[test]
    fn unset_keys_fall_back() {
        let value: u32 = parse_or("PEG_BILLIARDS_TEST_SURELY_UNSET", 17).unwrap();
        assert_eq!(value, 17);
    }
}
