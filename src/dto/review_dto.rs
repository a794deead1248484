use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::review::Review;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub talent: i64,
    pub reviewer_name: String,
    pub reviewer_organization: String,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            talent: r.talent_id,
            reviewer_name: r.reviewer_name,
            reviewer_organization: r.reviewer_organization,
            review: r.review,
            rating: r.rating,
            created_at: r.created_at,
        }
    }
}

/// `reviewer_organization` comes from the authenticated company.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateReviewPayload {
    pub talent: i64,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub reviewer_name: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub review: String,
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,
}
