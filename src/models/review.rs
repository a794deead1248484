use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i64,
    pub talent_id: i64,
    pub company_id: Option<i64>,
    pub reviewer_name: String,
    pub reviewer_organization: String,
    pub review: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub talent_id: i64,
    pub company_id: Option<i64>,
    pub reviewer_name: String,
    pub reviewer_organization: String,
    pub review: String,
    pub rating: i32,
}
