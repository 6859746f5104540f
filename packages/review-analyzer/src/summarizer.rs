//! Review summarization.
//!
//! Builds a bounded prompt from the review set and asks an external
//! text generator for a short objective summary. Generation failures
//! never propagate: each failure category degrades to its own
//! recognizable sentinel string so callers (batch drivers, exporters)
//! can tell a real summary from an unavailable one.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};

use crate::retry::{FailureKind, RetryPolicy};
use crate::types::Review;

/// Sentinel returned without calling the generator at all.
pub const NO_REVIEWS_SUMMARY: &str = "No reviews available for analysis.";

/// Sentinel for quota exhaustion (permanent for the billing period).
pub const QUOTA_SUMMARY: &str = "Analysis unavailable due to API quota limits.";

/// Sentinel for rate limiting after the retry budget ran out.
pub const RATE_LIMIT_SUMMARY: &str = "Analysis unavailable due to rate limits.";

/// Sentinel for any other generation failure.
pub const ERROR_SUMMARY: &str = "Error generating analysis.";

/// Maximum tokens requested for the summary completion.
const MAX_SUMMARY_TOKENS: u32 = 300;

/// Prompt byte budget; review text beyond this is cut at a char
/// boundary to stay inside the model's context window.
const MAX_PROMPT_BYTES: usize = 48_000;

/// Attempts and base backoff for rate-limited generation calls.
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(5);

const SUMMARY_INSTRUCTION: &str = "Please analyze the following professor reviews and provide \
a 150-word summary that captures the main themes, strengths, and areas for improvement \
mentioned by students. Focus on the most common patterns in the feedback while maintaining \
objectivity. Consider both the quality and difficulty ratings in your analysis.";

const SYSTEM_PROMPT: &str = "You are an educational analyst summarizing professor reviews.";

/// Failure categories of the text-generation capability. Transports
/// must classify their errors into exactly these three buckets; the
/// retry policy and the sentinel choice key on them.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("generation failed: {0}")]
    Other(String),
}

/// External text-generation capability.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt, bounded to `max_tokens` output.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerateError>;
}

/// [`TextGenerator`] backed by the OpenAI chat completions API.
pub struct OpenAiGenerator {
    client: OpenAIClient,
    model: String,
}

impl OpenAiGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, GenerateError> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(prompt))
            .max_tokens(max_tokens);

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| match e {
                OpenAIError::QuotaExhausted(msg) => GenerateError::QuotaExhausted(msg),
                OpenAIError::RateLimited(msg) => GenerateError::RateLimited(msg),
                other => GenerateError::Other(other.to_string()),
            })?;

        Ok(response.content)
    }
}

/// True for any of the failure sentinels (but not for the no-reviews
/// placeholder, which is a legitimate answer for an empty set).
pub fn is_unavailable(summary: &str) -> bool {
    summary.starts_with("Analysis unavailable") || summary.starts_with("Error generating")
}

/// Prompt construction and retry policy around a [`TextGenerator`].
pub struct ReviewSummarizer {
    generator: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
}

impl ReviewSummarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            policy: RetryPolicy::new(RETRY_ATTEMPTS, RETRY_BASE_DELAY),
        }
    }

    /// Override the retry policy (tests use zero delays).
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Summarize a review set.
    ///
    /// Always returns a string: a genuine summary, or one of the
    /// sentinels. Quota failures abort immediately, rate limits are
    /// retried with linear backoff, anything else fails fast.
    pub async fn summarize(&self, reviews: &[Review]) -> String {
        if reviews.is_empty() {
            return NO_REVIEWS_SUMMARY.to_string();
        }

        let prompt = build_prompt(reviews);
        debug!(
            reviews = reviews.len(),
            prompt_bytes = prompt.len(),
            "Requesting review summary"
        );

        let result = self
            .policy
            .run(
                |e: &GenerateError| match e {
                    GenerateError::RateLimited(_) => FailureKind::Retryable,
                    _ => FailureKind::NonRetryable,
                },
                || self.generator.generate(&prompt, MAX_SUMMARY_TOKENS),
            )
            .await;

        match result {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                error!("Generator returned an empty summary");
                ERROR_SUMMARY.to_string()
            }
            Err(GenerateError::QuotaExhausted(msg)) => {
                error!(detail = %msg, "Quota exhausted, skipping analysis");
                QUOTA_SUMMARY.to_string()
            }
            Err(GenerateError::RateLimited(msg)) => {
                warn!(detail = %msg, "Rate limited after all retries, skipping analysis");
                RATE_LIMIT_SUMMARY.to_string()
            }
            Err(GenerateError::Other(msg)) => {
                error!(detail = %msg, "Summary generation failed");
                ERROR_SUMMARY.to_string()
            }
        }
    }
}

/// Concatenate the instruction and one block per review. Absent
/// ratings render as a literal `N/A` so they stay distinguishable
/// from real values.
fn build_prompt(reviews: &[Review]) -> String {
    let blocks: Vec<String> = reviews
        .iter()
        .map(|review| {
            format!(
                "Quality Rating: {}/5\nDifficulty Rating: {}/5\nReview: {}",
                fmt_rating(review.quality_rating),
                fmt_rating(review.difficulty_rating),
                review.text
            )
        })
        .collect();

    let prompt = format!("{}\n\nReviews:\n{}", SUMMARY_INSTRUCTION, blocks.join("\n\n"));
    truncate_to_char_boundary(&prompt, MAX_PROMPT_BYTES).to_string()
}

fn fmt_rating(rating: Option<f64>) -> String {
    match rating {
        Some(value) => format!("{}", value),
        None => "N/A".to_string(),
    }
}

/// Truncate a string to at most `max_bytes` bytes at a character boundary.
fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}
