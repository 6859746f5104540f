//! Canonical data shapes produced and consumed by the pipeline.

use serde::Serialize;

/// Sentinel timestamp used when the source omits a review date.
pub const UNKNOWN_DATE: &str = "Unknown date";

/// A single professor review in canonical form.
///
/// Ratings are `None` when the source omitted them, never coerced to
/// zero. A review with both ratings absent is still valid and counts
/// toward the review total; it just contributes to neither average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    /// Review body; empty string when the source omitted it.
    pub text: String,

    /// Source-native date string, passed through unparsed.
    /// [`UNKNOWN_DATE`] when absent.
    pub timestamp: String,

    /// Quality rating in [1, 5], absent when unavailable.
    pub quality_rating: Option<f64>,

    /// Difficulty rating in [1, 5], absent when unavailable.
    pub difficulty_rating: Option<f64>,
}

/// Mean ratings over a review set, each absent when no review carried
/// that rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RatingAverages {
    pub quality: Option<f64>,
    pub difficulty: Option<f64>,
}

/// Final per-profile output: review count, numeric aggregates, and the
/// generated (or sentinel) summary text.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub review_count: usize,
    pub average_quality: Option<f64>,
    pub average_difficulty: Option<f64>,
    pub summary: String,
}
