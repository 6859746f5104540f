//! Paginated review fetching.
//!
//! Drives the cursor loop against a [`ReviewSource`], normalizing each
//! page as it arrives. Pagination is strictly sequential: the cursor
//! must be threaded through in order and the source is rate-limit
//! sensitive, so pages are never fetched in parallel and never retried
//! individually. Whole-profile retry, if wanted, belongs to callers.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::normalize::normalize;
use crate::resolver::CanonicalId;
use crate::retry::{FailureKind, RetryPolicy};
use crate::source::{ReviewSource, SourceError};
use crate::types::Review;

/// Records requested per page; the source default.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pause between successful page requests; a politeness knob, not a
/// correctness requirement.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Pagination knobs.
#[derive(Debug, Clone, Copy)]
pub struct FetchConfig {
    pub page_size: u32,
    pub page_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// How a fetch ended short of full pagination.
#[derive(Debug)]
pub enum PageFailure {
    /// The very first page failed: nothing was collected and the
    /// profile cannot be analyzed.
    FirstPage(SourceError),

    /// A page after the first failed: everything collected up to that
    /// point is still valid and must be surfaced.
    LaterPage { page: u32, error: SourceError },
}

/// Result of a whole-profile fetch: the reviews collected (possibly
/// partial) plus the failure that stopped pagination, if any.
#[derive(Debug)]
pub struct FetchOutcome {
    pub reviews: Vec<Review>,
    pub failure: Option<PageFailure>,
}

impl FetchOutcome {
    /// True when pagination ran to natural completion (or truncation).
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Cursor-pagination driver over a [`ReviewSource`].
pub struct ReviewFetcher {
    source: Arc<dyn ReviewSource>,
    config: FetchConfig,
}

impl ReviewFetcher {
    pub fn new(source: Arc<dyn ReviewSource>, config: FetchConfig) -> Self {
        Self { source, config }
    }

    /// Fetch all reviews for a professor, paging until the source is
    /// exhausted or `max_reviews` is reached.
    ///
    /// Truncation is applied after each page, before the cursor is
    /// consulted, so the result never exceeds `max_reviews` even when
    /// the final page overshoots it.
    pub async fn fetch_all(
        &self,
        professor_id: &CanonicalId,
        course_filter: Option<&str>,
        max_reviews: Option<usize>,
    ) -> FetchOutcome {
        // Pages are never retried individually (whole-profile retry is
        // the caller's business), expressed as a single-attempt policy.
        let page_policy = RetryPolicy::none();

        let mut reviews: Vec<Review> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0u32;

        loop {
            page_number += 1;

            let page = match page_policy
                .run(
                    |_: &SourceError| FailureKind::NonRetryable,
                    || {
                        self.source.fetch_page(
                            professor_id,
                            course_filter,
                            self.config.page_size,
                            cursor.as_deref(),
                        )
                    },
                )
                .await
            {
                Ok(page) => page,
                Err(error) if page_number == 1 => {
                    warn!(id = %professor_id, error = %error, "First page fetch failed, aborting");
                    return FetchOutcome {
                        reviews: Vec::new(),
                        failure: Some(PageFailure::FirstPage(error)),
                    };
                }
                Err(error) => {
                    warn!(
                        id = %professor_id,
                        page = page_number,
                        collected = reviews.len(),
                        error = %error,
                        "Page fetch failed, returning partial results"
                    );
                    return FetchOutcome {
                        reviews,
                        failure: Some(PageFailure::LaterPage {
                            page: page_number,
                            error,
                        }),
                    };
                }
            };

            let fetched = page.reviews.len();
            reviews.extend(page.reviews.into_iter().map(normalize));
            info!(
                page = page_number,
                fetched = fetched,
                total = reviews.len(),
                "Fetched ratings page"
            );

            if let Some(max) = max_reviews {
                if reviews.len() >= max {
                    info!(max_reviews = max, "Reached review limit, stopping pagination");
                    reviews.truncate(max);
                    break;
                }
            }

            // An absent or empty cursor always terminates, whatever
            // has_next_page claims.
            let next_cursor = page.end_cursor.filter(|c| !c.is_empty());
            match next_cursor {
                Some(c) if page.has_next_page => {
                    cursor = Some(c);
                }
                _ => {
                    info!(total = reviews.len(), "No more pages");
                    break;
                }
            }

            if !self.config.page_delay.is_zero() {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }

        FetchOutcome {
            reviews,
            failure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver;
    use crate::source::{RawReview, ReviewPage};
    use crate::testing::MockReviewSource;

    fn raw(comment: &str, quality: Option<f64>) -> RawReview {
        RawReview {
            comment: Some(comment.to_string()),
            date: Some("2024-01-01".to_string()),
            clarity_rating: quality,
            difficulty_rating: Some(3.0),
        }
    }

    fn page(comments: &[&str], has_next: bool, cursor: Option<&str>) -> ReviewPage {
        ReviewPage {
            reviews: comments.iter().map(|c| raw(c, Some(4.0))).collect(),
            has_next_page: has_next,
            end_cursor: cursor.map(String::from),
        }
    }

    fn fetcher(source: MockReviewSource) -> ReviewFetcher {
        let config = FetchConfig {
            page_size: 20,
            page_delay: Duration::ZERO,
        };
        ReviewFetcher::new(Arc::new(source), config)
    }

    fn canonical() -> CanonicalId {
        resolver::resolve("12345").unwrap()
    }

    #[tokio::test]
    async fn test_accumulates_pages_in_source_order() {
        let source = MockReviewSource::new()
            .with_page(Ok(page(&["a", "b"], true, Some("c1"))))
            .with_page(Ok(page(&["c"], false, None)));
        let source_calls = source.calls();

        let outcome = fetcher(source).fetch_all(&canonical(), None, None).await;

        assert!(outcome.is_complete());
        let texts: Vec<&str> = outcome.reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);

        // Second request must carry the first page's cursor.
        let calls = source_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].cursor, None);
        assert_eq!(calls[1].cursor.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_empty_cursor_terminates_despite_has_next_page() {
        let source = MockReviewSource::new().with_page(Ok(page(&["a"], true, Some(""))));
        let source_calls = source.calls();

        let outcome = fetcher(source).fetch_all(&canonical(), None, None).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.reviews.len(), 1);
        assert_eq!(source_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_absent_cursor_terminates_despite_has_next_page() {
        let source = MockReviewSource::new().with_page(Ok(page(&["a"], true, None)));

        let outcome = fetcher(source).fetch_all(&canonical(), None, None).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_truncates_to_max_reviews_from_front() {
        let source = MockReviewSource::new()
            .with_page(Ok(page(&["a", "b"], true, Some("c1"))))
            .with_page(Ok(page(&["c", "d"], true, Some("c2"))));
        let source_calls = source.calls();

        let outcome = fetcher(source).fetch_all(&canonical(), None, Some(3)).await;

        assert!(outcome.is_complete());
        let texts: Vec<&str> = outcome.reviews.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        // Limit reached after the second page; no third request.
        assert_eq!(source_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_truncation_applies_even_on_final_page() {
        // hasNextPage=false on the page that overshoots the cap: the
        // cap still wins.
        let source =
            MockReviewSource::new().with_page(Ok(page(&["a", "b", "c", "d"], false, None)));

        let outcome = fetcher(source).fetch_all(&canonical(), None, Some(2)).await;

        assert_eq!(outcome.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_first_page_failure_returns_empty_set() {
        let source = MockReviewSource::new().with_page(Err(SourceError::Network(
            "connection refused".to_string(),
        )));

        let outcome = fetcher(source).fetch_all(&canonical(), None, None).await;

        assert!(outcome.reviews.is_empty());
        assert!(matches!(outcome.failure, Some(PageFailure::FirstPage(_))));
    }

    #[tokio::test]
    async fn test_later_page_failure_keeps_partial_results() {
        let source = MockReviewSource::new()
            .with_page(Ok(page(&["a", "b"], true, Some("c1"))))
            .with_page(Err(SourceError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            }));

        let outcome = fetcher(source).fetch_all(&canonical(), None, None).await;

        assert_eq!(outcome.reviews.len(), 2);
        assert!(matches!(
            outcome.failure,
            Some(PageFailure::LaterPage { page: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_course_filter_forwarded_to_source() {
        let source = MockReviewSource::new().with_page(Ok(page(&["a"], false, None)));
        let source_calls = source.calls();

        fetcher(source)
            .fetch_all(&canonical(), Some("CS101"), None)
            .await;

        let calls = source_calls.lock().unwrap();
        assert_eq!(calls[0].course_filter.as_deref(), Some("CS101"));
    }
}
