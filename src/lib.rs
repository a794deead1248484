pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::database::DynStore;
use crate::error::Result;
use crate::services::{
    company_service::CompanyService,
    discord_service::DiscordService,
    experience_service::ExperienceService,
    identity_service::{AuthService, IdentityProvider},
    job_service::JobService,
    review_service::ReviewService,
    talent_service::TalentService,
    twitter_service::TwitterService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: DynStore,
    pub talent_service: TalentService,
    pub job_service: JobService,
    pub experience_service: ExperienceService,
    pub review_service: ReviewService,
    pub company_service: CompanyService,
    pub discord_service: DiscordService,
    pub twitter_service: TwitterService,
    pub auth_service: AuthService,
}

impl AppState {
    pub fn new(store: DynStore, config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let talent_service = TalentService::new(store.clone());
        let job_service = JobService::new(store.clone());
        let experience_service = ExperienceService::new(store.clone());
        let review_service = ReviewService::new(store.clone());
        let company_service = CompanyService::new(
            store.clone(),
            config.jwt_secret.clone(),
            config.jwt_ttl_hours,
        );
        let discord_service = DiscordService::new(http_client.clone(), config.discord.clone());
        let twitter_service =
            TwitterService::new(http_client, config.twitter.clone(), store.clone());

        let providers: Vec<Arc<dyn IdentityProvider>> = vec![
            Arc::new(discord_service.clone()),
            Arc::new(twitter_service.clone()),
        ];
        let auth_service = AuthService::new(providers, talent_service.clone());

        Ok(Self {
            config: Arc::new(config),
            store,
            talent_service,
            job_service,
            experience_service,
            review_service,
            company_service,
            discord_service,
            twitter_service,
            auth_service,
        })
    }
}
