use tracing::info;
use validator::Validate;

use crate::database::{DynStore, PageWindow, Paged};
use crate::dto::review_dto::CreateReviewPayload;
use crate::error::{Error, Result};
use crate::models::{
    company::Company,
    review::{NewReview, Review},
};

#[derive(Clone)]
pub struct ReviewService {
    store: DynStore,
}

impl ReviewService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, talent_id: Option<i64>, window: PageWindow) -> Result<Paged<Review>> {
        self.store.list_reviews(talent_id, window).await
    }

    pub async fn get(&self, id: i64) -> Result<Review> {
        self.store
            .get_review(id)
            .await?
            .ok_or_else(|| Error::NotFound("Review not found".to_string()))
    }

    /// The reviewing organization is always the authenticated company.
    pub async fn create(&self, company: &Company, payload: CreateReviewPayload) -> Result<Review> {
        payload.validate()?;
        if self.store.get_talent(payload.talent).await?.is_none() {
            return Err(Error::BadRequest(format!(
                "Invalid talent \"{}\" - object does not exist.",
                payload.talent
            )));
        }
        let review = self
            .store
            .insert_review(NewReview {
                talent_id: payload.talent,
                company_id: Some(company.id),
                reviewer_name: payload.reviewer_name,
                reviewer_organization: company.name.clone(),
                review: payload.review,
                rating: payload.rating,
            })
            .await?;
        info!(review_id = review.id, talent_id = review.talent_id, "review posted");
        Ok(review)
    }
}
