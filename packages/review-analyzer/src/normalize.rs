//! Raw record normalization.
//!
//! Field-by-field defaulting into the canonical [`Review`] shape.
//! Never fails: a malformed record yields a best-effort review rather
//! than poisoning the whole page.

use crate::source::RawReview;
use crate::types::{Review, UNKNOWN_DATE};

/// Normalize one raw source record into a canonical [`Review`].
///
/// Missing comment becomes an empty string, missing date becomes the
/// [`UNKNOWN_DATE`] sentinel, and missing ratings stay absent (never
/// zero, never NaN) so they are excluded from averages.
pub fn normalize(raw: RawReview) -> Review {
    Review {
        text: raw.comment.unwrap_or_default(),
        timestamp: raw.date.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        quality_rating: raw.clarity_rating.filter(|r| r.is_finite()),
        difficulty_rating: raw.difficulty_rating.filter(|r| r.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record_passes_through() {
        let review = normalize(RawReview {
            comment: Some("Great professor".into()),
            date: Some("2024-02-01 17:03:01 +0000 UTC".into()),
            clarity_rating: Some(5.0),
            difficulty_rating: Some(2.0),
        });

        assert_eq!(review.text, "Great professor");
        assert_eq!(review.timestamp, "2024-02-01 17:03:01 +0000 UTC");
        assert_eq!(review.quality_rating, Some(5.0));
        assert_eq!(review.difficulty_rating, Some(2.0));
    }

    #[test]
    fn test_empty_record_gets_defaults() {
        let review = normalize(RawReview::default());

        assert_eq!(review.text, "");
        assert_eq!(review.timestamp, UNKNOWN_DATE);
        assert_eq!(review.quality_rating, None);
        assert_eq!(review.difficulty_rating, None);
    }

    #[test]
    fn test_missing_ratings_stay_absent_not_zero() {
        let review = normalize(RawReview {
            comment: Some("Hard class".into()),
            date: None,
            clarity_rating: None,
            difficulty_rating: Some(4.0),
        });

        assert_eq!(review.quality_rating, None);
        assert_ne!(review.quality_rating, Some(0.0));
        assert_eq!(review.difficulty_rating, Some(4.0));
    }

    #[test]
    fn test_non_finite_ratings_dropped() {
        let review = normalize(RawReview {
            comment: None,
            date: None,
            clarity_rating: Some(f64::NAN),
            difficulty_rating: Some(f64::INFINITY),
        });

        assert_eq!(review.quality_rating, None);
        assert_eq!(review.difficulty_rating, None);
    }
}
