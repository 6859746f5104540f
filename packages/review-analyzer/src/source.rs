//! The paged review data source seam.
//!
//! [`ReviewSource`] abstracts the cursor-paginated review protocol so
//! the fetcher can be exercised against a mock in tests and the
//! concrete transport (see [`crate::graphql`]) can be swapped without
//! touching normalization, aggregation or summarization.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::resolver::CanonicalId;

/// Errors from a single page request against the review source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Request never completed (connection failure, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx HTTP response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The source answered 200 but reported query errors
    #[error("source query error: {0}")]
    Query(String),

    /// Response parsed but the expected structure was missing
    #[error("unexpected response structure: {0}")]
    Schema(String),
}

/// A raw review record as the source returns it. Every field may be
/// absent; normalization fills the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReview {
    /// Review body text
    pub comment: Option<String>,

    /// Source-native date string
    pub date: Option<String>,

    /// Quality rating ("clarity" in source terms), [1, 5]
    #[serde(rename = "clarityRating")]
    pub clarity_rating: Option<f64>,

    /// Difficulty rating, [1, 5]
    #[serde(rename = "difficultyRating")]
    pub difficulty_rating: Option<f64>,
}

/// One page of results from the review source.
#[derive(Debug, Clone, Default)]
pub struct ReviewPage {
    /// Raw records in source page order
    pub reviews: Vec<RawReview>,

    /// Whether the source claims more pages exist
    pub has_next_page: bool,

    /// Cursor for the next page. An absent or empty cursor always
    /// terminates pagination, whatever `has_next_page` says.
    pub end_cursor: Option<String>,
}

/// Cursor-paginated review data source.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetch a single page of reviews for a professor.
    ///
    /// `cursor` is `None` on the first request. `course_filter`
    /// restricts results to one course code when the source supports
    /// it.
    async fn fetch_page(
        &self,
        professor_id: &CanonicalId,
        course_filter: Option<&str>,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ReviewPage, SourceError>;
}
