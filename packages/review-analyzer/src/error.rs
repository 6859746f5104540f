//! Typed per-profile pipeline errors.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can
//! match on the failure category. Each profile's outcome is
//! independent: none of these abort a batch, they only mark one
//! profile as unanalyzable.

use thiserror::Error;

use crate::source::SourceError;

/// Per-profile pipeline failure.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The profile reference carries no extractable professor ID.
    /// Non-retryable; the data source was never contacted.
    #[error("could not resolve a professor id from: {reference}")]
    IdentifierResolution { reference: String },

    /// The first page request failed, so nothing was collected.
    #[error("review fetch failed for {reference}: {source}")]
    UpstreamFetch {
        reference: String,
        #[source]
        source: SourceError,
    },

    /// Pagination completed but the profile has no reviews.
    #[error("no reviews found for {reference}")]
    NoReviews { reference: String },
}
