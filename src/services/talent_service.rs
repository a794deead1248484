use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::info;
use validator::Validate;

use crate::database::{DynStore, PageWindow, Paged};
use crate::dto::{JsonBody, NamesPayload};
use crate::error::{Error, Result};
use crate::models::{
    skill::Skill,
    talent::{Talent, TalentFilter, TalentUpdate},
};
use crate::services::identity_service::{Provider, ProviderIdentity};

pub const MAX_SKILLS: usize = 5;

#[derive(Clone)]
pub struct TalentService {
    store: DynStore,
}

impl TalentService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: TalentFilter, window: PageWindow) -> Result<Paged<Talent>> {
        self.store.list_talents(&filter, window).await
    }

    pub async fn get(&self, id: i64) -> Result<Talent> {
        self.store
            .get_talent(id)
            .await?
            .ok_or_else(|| Error::NotFound("Talent not found".to_string()))
    }

    /// Profile read that counts one visit per session key.
    pub async fn view(&self, id: i64, session_key: &str) -> Result<Talent> {
        self.get(id).await?;
        if self.store.record_unique_visit(id, session_key).await? {
            info!(talent_id = id, "new unique profile visit");
        }
        self.get(id).await
    }

    /// Loads the talent and checks that `actor` is that talent.
    async fn owned(&self, actor: &Talent, id: i64) -> Result<Talent> {
        let talent = self.get(id).await?;
        if talent.id != actor.id {
            return Err(Error::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ));
        }
        Ok(talent)
    }

    /// Decodes and applies any talent payload after the ownership check, so a
    /// stranger gets 403 before their body is looked at.
    pub async fn update<P>(&self, actor: &Talent, id: i64, body: JsonBody) -> Result<Talent>
    where
        P: DeserializeOwned + Validate + Into<TalentUpdate>,
    {
        self.owned(actor, id).await?;
        let payload: P = body.parse()?;
        payload.validate()?;
        self.store.update_talent(id, payload.into()).await
    }

    pub async fn delete(&self, actor: &Talent, id: i64) -> Result<()> {
        self.owned(actor, id).await?;
        self.store.delete_talent(id).await?;
        info!(talent_id = id, "talent deleted");
        Ok(())
    }

    pub async fn skills(&self, id: i64) -> Result<Vec<Skill>> {
        self.get(id).await?;
        self.store.talent_skills(id).await
    }

    pub async fn replace_skills(
        &self,
        actor: &Talent,
        id: i64,
        body: JsonBody,
    ) -> Result<Vec<Skill>> {
        self.owned(actor, id).await?;
        let names = body.parse::<NamesPayload>()?.normalized()?;
        if names.len() > MAX_SKILLS {
            return Err(Error::BadRequest(
                "You can only select a maximum of 5 skills.".to_string(),
            ));
        }
        self.store.replace_talent_skills(id, &names).await
    }

    pub async fn list_skills(&self) -> Result<Vec<Skill>> {
        self.store.list_skills().await
    }

    pub async fn average_rating(&self, id: i64) -> Result<Option<f64>> {
        self.get(id).await?;
        self.store.average_rating(id).await
    }

    /// Finds or creates the talent behind a provider account. With
    /// `stamp_login` the provider handle is (re)linked and `last_login` set.
    pub async fn sign_in(&self, identity: ProviderIdentity, stamp_login: bool) -> Result<Talent> {
        let id = identity.id();
        let now = stamp_login.then(Utc::now);

        if let Some(existing) = self.store.get_talent(id).await? {
            if !stamp_login {
                return Ok(existing);
            }
            let handle = identity.handle().map(str::to_string);
            let mut update = TalentUpdate {
                last_login: now,
                ..TalentUpdate::default()
            };
            match identity.provider {
                Provider::Discord => update.discord_profile = handle,
                Provider::Twitter => update.twitter_profile = handle,
            }
            return self.store.update_talent(id, update).await;
        }

        let mut profile = identity.profile;
        profile.last_login = now;
        match self.store.insert_talent(profile).await {
            Ok(talent) => {
                info!(talent_id = id, provider = %identity.provider, "talent created");
                Ok(talent)
            }
            // Lost a race with a concurrent first sign-in.
            Err(Error::Conflict(_)) => self.get(id).await,
            Err(e) => Err(e),
        }
    }
}
