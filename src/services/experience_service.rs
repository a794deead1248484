use std::collections::HashMap;

use chrono::NaiveDate;
use validator::Validate;

use crate::database::{DynStore, PageWindow, Paged};
use crate::dto::{
    experience_dto::{ExperiencePatchPayload, ExperiencePayload, ExperienceResponse},
    JsonBody,
};
use crate::error::{Error, Result};
use crate::models::{
    experience::{Experience, ExperienceUpdate, NewExperience},
    talent::Talent,
};

#[derive(Clone)]
pub struct ExperienceService {
    store: DynStore,
}

/// `end_date` is required unless still working there, and never precedes
/// `start_date`.
fn check_dates(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    currently_working: bool,
) -> Result<()> {
    match end_date {
        None if !currently_working => Err(Error::BadRequest(
            "end_date is required unless currently_working is set.".to_string(),
        )),
        Some(end) if end < start_date => Err(Error::BadRequest(
            "end_date must not be before start_date.".to_string(),
        )),
        _ => Ok(()),
    }
}

impl ExperienceService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<ExperienceResponse>> {
        let paged = self.store.list_experiences(talent_id, window).await?;
        let ids: Vec<i64> = paged.items.iter().map(|e| e.talent_id).collect();
        let talents: HashMap<i64, Talent> = self
            .store
            .get_talents(&ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let items = paged
            .items
            .into_iter()
            .filter_map(|e| {
                let talent = talents.get(&e.talent_id).cloned()?;
                Some(ExperienceResponse::new(e, talent))
            })
            .collect();
        Ok(Paged {
            items,
            total: paged.total,
        })
    }

    async fn find(&self, id: i64) -> Result<Experience> {
        self.store
            .get_experience(id)
            .await?
            .ok_or_else(|| Error::NotFound("Experience not found".to_string()))
    }

    async fn embed(&self, experience: Experience) -> Result<ExperienceResponse> {
        let talent = self
            .store
            .get_talent(experience.talent_id)
            .await?
            .ok_or_else(|| Error::NotFound("Talent not found".to_string()))?;
        Ok(ExperienceResponse::new(experience, talent))
    }

    pub async fn get(&self, id: i64) -> Result<ExperienceResponse> {
        let experience = self.find(id).await?;
        self.embed(experience).await
    }

    async fn owned(&self, actor: &Talent, id: i64) -> Result<Experience> {
        let experience = self.find(id).await?;
        if experience.talent_id != actor.id {
            return Err(Error::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ));
        }
        Ok(experience)
    }

    pub async fn create(
        &self,
        actor: &Talent,
        payload: ExperiencePayload,
    ) -> Result<ExperienceResponse> {
        payload.validate()?;
        check_dates(payload.start_date, payload.end_date, payload.currently_working)?;
        let experience = self
            .store
            .insert_experience(NewExperience {
                talent_id: actor.id,
                project_logo: payload.project_logo,
                company_name: payload.company_name,
                role: payload.role,
                description: payload.description,
                start_date: payload.start_date,
                end_date: payload.end_date,
                currently_working: payload.currently_working,
                twitter_link: payload.twitter_link,
                discord_link: payload.discord_link,
            })
            .await?;
        tracing::info!(experience_id = experience.id, talent_id = actor.id, "experience added");
        Ok(ExperienceResponse::new(experience, actor.clone()))
    }

    pub async fn replace(
        &self,
        actor: &Talent,
        id: i64,
        body: JsonBody,
    ) -> Result<ExperienceResponse> {
        self.owned(actor, id).await?;
        let payload: ExperiencePayload = body.parse()?;
        payload.validate()?;
        self.apply(id, payload.into()).await
    }

    pub async fn patch(
        &self,
        actor: &Talent,
        id: i64,
        body: JsonBody,
    ) -> Result<ExperienceResponse> {
        self.owned(actor, id).await?;
        let payload: ExperiencePatchPayload = body.parse()?;
        payload.validate()?;
        self.apply(id, payload.into()).await
    }

    /// Validates the merged row before writing it.
    async fn apply(&self, id: i64, update: ExperienceUpdate) -> Result<ExperienceResponse> {
        let mut merged = self.find(id).await?;
        merged.apply(update.clone());
        check_dates(merged.start_date, merged.end_date, merged.currently_working)?;
        let experience = self.store.update_experience(id, update).await?;
        self.embed(experience).await
    }

    pub async fn delete(&self, actor: &Talent, id: i64) -> Result<()> {
        self.owned(actor, id).await?;
        self.store.delete_experience(id).await?;
        Ok(())
    }
}
