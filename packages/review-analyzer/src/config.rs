//! Environment-driven configuration.
//!
//! Loaded once at startup; a missing summarization credential is a
//! startup-time fatal condition, never a per-request one.

use std::time::Duration;
use thiserror::Error;

use crate::fetcher::{FetchConfig, DEFAULT_PAGE_DELAY, DEFAULT_PAGE_SIZE};

/// Pause between profiles in a batch run (rate-limit politeness).
const DEFAULT_PROFILE_DELAY_MS: u64 = 3_000;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {name}: {value}")]
    InvalidVar { name: &'static str, value: String },
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key for summarization.
    pub openai_api_key: String,

    /// Chat model used for summaries.
    pub openai_model: String,

    /// Records requested per review page.
    pub page_size: u32,

    /// Delay between successful page requests.
    pub page_delay: Duration,

    /// Delay between profiles in a batch run.
    pub profile_delay: Duration,

    /// Cap on reviews collected per profile (unlimited when absent).
    pub max_reviews: Option<usize>,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::MissingVar("OPENAI_API_KEY"))?;

        let openai_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let page_size = parse_var("REVIEW_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE);
        let page_delay = parse_var("PAGE_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PAGE_DELAY);
        let profile_delay = Duration::from_millis(
            parse_var("PROFILE_DELAY_MS")?.unwrap_or(DEFAULT_PROFILE_DELAY_MS),
        );
        let max_reviews = parse_var("MAX_REVIEWS")?;

        Ok(Self {
            openai_api_key,
            openai_model,
            page_size,
            page_delay,
            profile_delay,
            max_reviews,
        })
    }

    /// Pagination knobs for the fetcher.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            page_size: self.page_size,
            page_delay: self.page_delay,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_absent_is_none() {
        std::env::remove_var("REVIEW_ANALYZER_TEST_UNSET");
        let parsed: Option<u32> = parse_var("REVIEW_ANALYZER_TEST_UNSET").unwrap();
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_parse_var_invalid_is_error() {
        std::env::set_var("REVIEW_ANALYZER_TEST_BAD", "not-a-number");
        let parsed: Result<Option<u32>, _> = parse_var("REVIEW_ANALYZER_TEST_BAD");
        assert!(matches!(parsed, Err(ConfigError::InvalidVar { .. })));
        std::env::remove_var("REVIEW_ANALYZER_TEST_BAD");
    }
}
