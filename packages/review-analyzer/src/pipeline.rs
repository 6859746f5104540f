//! Pipeline orchestration.
//!
//! Wires resolver, fetcher, aggregator and summarizer into a single
//! per-profile operation. Dependencies are injected as trait objects
//! so tests substitute fakes for both external collaborators.

use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::aggregate;
use crate::error::AnalyzeError;
use crate::fetcher::{FetchConfig, PageFailure, ReviewFetcher};
use crate::resolver;
use crate::retry::RetryPolicy;
use crate::source::ReviewSource;
use crate::summarizer::{ReviewSummarizer, TextGenerator};
use crate::types::AnalysisResult;

/// The review analysis pipeline.
///
/// One instance serves any number of profile references; each
/// `analyze` call owns its review set and shares nothing mutable, so
/// invocations may run concurrently if the caller accepts the
/// rate-limit exposure.
pub struct ReviewAnalyzer {
    fetcher: ReviewFetcher,
    summarizer: ReviewSummarizer,
    max_reviews: Option<usize>,
}

impl ReviewAnalyzer {
    pub fn new(
        source: Arc<dyn ReviewSource>,
        generator: Arc<dyn TextGenerator>,
        fetch_config: FetchConfig,
        max_reviews: Option<usize>,
    ) -> Self {
        Self {
            fetcher: ReviewFetcher::new(source, fetch_config),
            summarizer: ReviewSummarizer::new(generator),
            max_reviews,
        }
    }

    /// Override the summarizer retry policy (tests use zero delays).
    pub fn with_summary_policy(mut self, policy: RetryPolicy) -> Self {
        self.summarizer = self.summarizer.with_policy(policy);
        self
    }

    /// Analyze one professor profile reference.
    ///
    /// Resolves the reference, fetches and normalizes every review,
    /// then computes numeric aggregates and the textual summary over
    /// the same frozen set. A later-page fetch failure degrades to a
    /// partial result; a summarization failure degrades only the
    /// summary field. Both aggregates and the count always describe
    /// the full collected set.
    pub async fn analyze(
        &self,
        reference: &str,
        course_filter: Option<&str>,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let professor_id =
            resolver::resolve(reference).ok_or_else(|| AnalyzeError::IdentifierResolution {
                reference: reference.to_string(),
            })?;

        info!(reference = %reference, "Analyzing professor reviews");

        let outcome = self
            .fetcher
            .fetch_all(&professor_id, course_filter, self.max_reviews)
            .await;

        match outcome.failure {
            Some(PageFailure::FirstPage(source)) => {
                return Err(AnalyzeError::UpstreamFetch {
                    reference: reference.to_string(),
                    source,
                });
            }
            Some(PageFailure::LaterPage { page, error }) => {
                warn!(
                    reference = %reference,
                    page = page,
                    collected = outcome.reviews.len(),
                    error = %error,
                    "Pagination aborted, analyzing partial review set"
                );
            }
            None => {}
        }

        if outcome.reviews.is_empty() {
            return Err(AnalyzeError::NoReviews {
                reference: reference.to_string(),
            });
        }

        let averages = aggregate(&outcome.reviews);
        let summary = self.summarizer.summarize(&outcome.reviews).await;

        info!(
            reference = %reference,
            reviews = outcome.reviews.len(),
            average_quality = ?averages.quality,
            average_difficulty = ?averages.difficulty,
            "Analysis complete"
        );

        Ok(AnalysisResult {
            review_count: outcome.reviews.len(),
            average_quality: averages.quality,
            average_difficulty: averages.difficulty,
            summary,
        })
    }
}
