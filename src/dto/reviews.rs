use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Review;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitReviewRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
    #[validate(length(min = 1, max = 100, message = "reviewer_name is required"))]
    pub reviewer_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewList {
    pub items: Vec<Review>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, 0 when unrated.
    pub average: f64,
    pub count: i64,
}

impl RatingSummary {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self {
                average: 0.0,
                count: 0,
            };
        }
        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let count = ratings.len() as i64;
        let average = (sum as f64 / count as f64 * 10.0).round() / 10.0;
        Self { average, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrated_product_averages_zero() {
        assert_eq!(
            RatingSummary::from_ratings(&[]),
            RatingSummary {
                average: 0.0,
                count: 0
            }
        );
    }

    #[test]
    fn averages_and_rounds_to_one_decimal() {
        assert_eq!(RatingSummary::from_ratings(&[5, 3]).average, 4.0);
        assert_eq!(RatingSummary::from_ratings(&[5, 4, 4]).average, 4.3);
        assert_eq!(RatingSummary::from_ratings(&[1, 2]).count, 2);
    }
}
