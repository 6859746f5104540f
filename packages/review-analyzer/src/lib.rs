//! Professor review retrieval, aggregation and summarization.
//!
//! The pipeline turns a professor profile reference into an
//! [`AnalysisResult`]: the full review set is fetched page by page
//! from the rating site's GraphQL endpoint, normalized into a
//! canonical shape, and reduced to numeric averages plus an
//! LLM-generated summary.
//!
//! Both external collaborators sit behind traits — [`ReviewSource`]
//! for the paged data source and [`TextGenerator`] for the
//! summarization capability — so either transport can be swapped or
//! mocked without touching the pipeline.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use review_analyzer::{Config, OpenAiGenerator, ReviewAnalyzer, RmpClient};
//!
//! let config = Config::from_env()?;
//! let client = openai_client::OpenAIClient::new(&config.openai_api_key)?;
//!
//! let analyzer = ReviewAnalyzer::new(
//!     Arc::new(RmpClient::new()?),
//!     Arc::new(OpenAiGenerator::new(client, &config.openai_model)),
//!     config.fetch_config(),
//!     config.max_reviews,
//! );
//!
//! let result = analyzer
//!     .analyze("https://www.ratemyprofessors.com/professor/12345", None)
//!     .await?;
//! println!("{} reviews, summary: {}", result.review_count, result.summary);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod graphql;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod retry;
pub mod source;
pub mod summarizer;
pub mod testing;
pub mod types;

pub use aggregate::aggregate;
pub use config::{Config, ConfigError};
pub use error::AnalyzeError;
pub use fetcher::{FetchConfig, FetchOutcome, PageFailure, ReviewFetcher};
pub use graphql::RmpClient;
pub use normalize::normalize;
pub use pipeline::ReviewAnalyzer;
pub use resolver::{resolve, CanonicalId};
pub use retry::{FailureKind, RetryPolicy};
pub use source::{RawReview, ReviewPage, ReviewSource, SourceError};
pub use summarizer::{
    is_unavailable, GenerateError, OpenAiGenerator, ReviewSummarizer, TextGenerator,
    ERROR_SUMMARY, NO_REVIEWS_SUMMARY, QUOTA_SUMMARY, RATE_LIMIT_SUMMARY,
};
pub use types::{AnalysisResult, RatingAverages, Review, UNKNOWN_DATE};
