//! Numeric aggregation over a review set.

use crate::types::{RatingAverages, Review};

/// Compute mean quality and difficulty ratings.
///
/// Each average filters independently to the reviews carrying that
/// rating; a review missing one rating still contributes its other
/// one. When no review carries a rating the average is absent, not
/// zero.
pub fn aggregate(reviews: &[Review]) -> RatingAverages {
    RatingAverages {
        quality: mean(reviews.iter().filter_map(|r| r.quality_rating)),
        difficulty: mean(reviews.iter().filter_map(|r| r.difficulty_rating)),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(quality: Option<f64>, difficulty: Option<f64>) -> Review {
        Review {
            text: String::new(),
            timestamp: "Unknown date".into(),
            quality_rating: quality,
            difficulty_rating: difficulty,
        }
    }

    #[test]
    fn test_empty_set_has_no_averages() {
        let averages = aggregate(&[]);
        assert_eq!(averages.quality, None);
        assert_eq!(averages.difficulty, None);
    }

    #[test]
    fn test_arithmetic_mean() {
        let reviews = vec![
            review(Some(5.0), Some(2.0)),
            review(Some(3.0), Some(4.0)),
            review(Some(4.0), Some(3.0)),
        ];
        let averages = aggregate(&reviews);
        assert!((averages.quality.unwrap() - 4.0).abs() < 1e-9);
        assert!((averages.difficulty.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ratings_filtered_independently() {
        let reviews = vec![
            review(Some(5.0), Some(2.0)),
            review(None, Some(4.0)),
        ];
        let averages = aggregate(&reviews);
        assert_eq!(averages.quality, Some(5.0));
        assert_eq!(averages.difficulty, Some(3.0));
    }

    #[test]
    fn test_all_ratings_absent() {
        let reviews = vec![review(None, None), review(None, None)];
        let averages = aggregate(&reviews);
        assert_eq!(averages.quality, None);
        assert_eq!(averages.difficulty, None);
    }
}
