use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::dto::{
    auth_dto::{LoginResponse, RefreshPayload, RevokePayload, RevokeResponse, TokenSet},
    company_dto::{
        CompanyAuthResponse, CompanyLoginPayload, CompanyResponse, RegisterCompanyPayload,
    },
    experience_dto::{ExperiencePatchPayload, ExperiencePayload, ExperienceResponse},
    job_dto::{JobPatchPayload, JobPayload, JobResponse},
    pagination::{ExperiencePage, JobPage, ReviewPage, TalentPage},
    review_dto::{CreateReviewPayload, ReviewResponse},
    talent_dto::{
        AboutMePayload, AvatarPayload, AverageRatingResponse, LanguagePayload, SummaryPayload,
        TalentResponse, TimezonePayload, UpdateTalentPayload, UsernamePayload,
    },
    NamesPayload,
};
use crate::models::skill::{JobType, Skill};
use crate::routes;

/// Talents send `Bearer <provider token>`, companies `Token <jwt>`.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "Authorization",
                    "Company token, sent as `Token <jwt>`",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::index::index,
        routes::index::api_root,
        routes::health::health,
        routes::talent::list_talents,
        routes::talent::get_talent,
        routes::talent::update_talent,
        routes::talent::delete_talent,
        routes::talent::update_username,
        routes::talent::update_about_me,
        routes::talent::update_summary,
        routes::talent::update_language,
        routes::talent::update_timezone,
        routes::talent::update_avatar,
        routes::talent::get_skills,
        routes::talent::replace_skills,
        routes::talent::average_rating,
        routes::talent::list_skills,
        routes::job::list_jobs,
        routes::job::create_job,
        routes::job::get_job,
        routes::job::replace_job,
        routes::job::update_job,
        routes::job::delete_job,
        routes::job::get_job_types,
        routes::job::replace_job_types,
        routes::job::list_job_types,
        routes::experience::list_experiences,
        routes::experience::create_experience,
        routes::experience::get_experience,
        routes::experience::replace_experience,
        routes::experience::update_experience,
        routes::experience::delete_experience,
        routes::review::list_reviews,
        routes::review::create_review,
        routes::review::get_review,
        routes::company::register,
        routes::company::login,
        routes::company::me,
        routes::oauth::discord_login,
        routes::oauth::discord_callback,
        routes::oauth::discord_refresh,
        routes::oauth::discord_revoke,
        routes::oauth::twitter_login,
        routes::oauth::twitter_callback,
        routes::oauth::twitter_refresh,
        routes::oauth::twitter_revoke,
    ),
    components(
        schemas(
            TalentResponse,
            UpdateTalentPayload,
            UsernamePayload,
            AboutMePayload,
            SummaryPayload,
            LanguagePayload,
            TimezonePayload,
            AvatarPayload,
            AverageRatingResponse,
            NamesPayload,
            Skill,
            JobType,
            JobResponse,
            JobPayload,
            JobPatchPayload,
            ExperienceResponse,
            ExperiencePayload,
            ExperiencePatchPayload,
            ReviewResponse,
            CreateReviewPayload,
            CompanyResponse,
            RegisterCompanyPayload,
            CompanyLoginPayload,
            CompanyAuthResponse,
            TokenSet,
            LoginResponse,
            RefreshPayload,
            RevokePayload,
            RevokeResponse,
            TalentPage,
            JobPage,
            ExperiencePage,
            ReviewPage,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "talents", description = "Talent profiles, skills and visits"),
        (name = "jobs", description = "Job postings"),
        (name = "oauth2", description = "Discord and Twitter login")
    ),
    info(
        title = "Talent Marketplace API",
        version = "0.1.0",
        description = "Talent profiles, job postings, experiences and reviews with Discord/Twitter OAuth2 login"
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/talent",
            "/api/talent/{id}/skills",
            "/api/job/{id}",
            "/api/experience",
            "/api/review",
            "/discord/login/redirect",
            "/twitter/login",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
