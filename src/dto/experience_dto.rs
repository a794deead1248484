use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::talent_dto::TalentResponse;
use crate::models::{
    experience::{Experience, ExperienceUpdate},
    talent::Talent,
};
use crate::utils::validation::validate_not_blank;

/// Experience with its owning talent embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceResponse {
    pub id: i64,
    pub project_logo: String,
    pub company_name: String,
    pub role: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub currently_working: bool,
    pub verified: bool,
    pub twitter_link: String,
    pub discord_link: String,
    pub talent: TalentResponse,
}

impl ExperienceResponse {
    pub fn new(e: Experience, talent: Talent) -> Self {
        Self {
            id: e.id,
            project_logo: e.project_logo,
            company_name: e.company_name,
            role: e.role,
            description: e.description,
            start_date: e.start_date,
            end_date: e.end_date,
            currently_working: e.currently_working,
            verified: e.verified,
            twitter_link: e.twitter_link,
            discord_link: e.discord_link,
            talent: talent.into(),
        }
    }
}

/// Body of `POST /api/experience` and `PUT /api/experience/:id`.
/// `verified` is not part of the payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExperiencePayload {
    #[validate(url, length(max = 200))]
    pub project_logo: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub company_name: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub role: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub currently_working: bool,
    #[validate(url, length(max = 200))]
    pub twitter_link: String,
    #[validate(url, length(max = 200))]
    pub discord_link: String,
}

impl From<ExperiencePayload> for ExperienceUpdate {
    fn from(p: ExperiencePayload) -> Self {
        Self {
            project_logo: Some(p.project_logo),
            company_name: Some(p.company_name),
            role: Some(p.role),
            description: Some(p.description),
            start_date: Some(p.start_date),
            end_date: Some(p.end_date),
            currently_working: Some(p.currently_working),
            twitter_link: Some(p.twitter_link),
            discord_link: Some(p.discord_link),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExperiencePatchPayload {
    #[validate(url, length(max = 200))]
    pub project_logo: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub role: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Absent leaves the value alone, `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub end_date: Option<Option<NaiveDate>>,
    pub currently_working: Option<bool>,
    #[validate(url, length(max = 200))]
    pub twitter_link: Option<String>,
    #[validate(url, length(max = 200))]
    pub discord_link: Option<String>,
}

impl From<ExperiencePatchPayload> for ExperienceUpdate {
    fn from(p: ExperiencePatchPayload) -> Self {
        Self {
            project_logo: p.project_logo,
            company_name: p.company_name,
            role: p.role,
            description: p.description,
            start_date: p.start_date,
            end_date: p.end_date,
            currently_working: p.currently_working,
            twitter_link: p.twitter_link,
            discord_link: p.discord_link,
        }
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_null_from_missing() {
        let missing: ExperiencePatchPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.end_date, None);

        let cleared: ExperiencePatchPayload =
            serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(cleared.end_date, Some(None));

        let set: ExperiencePatchPayload =
            serde_json::from_str(r#"{"end_date": "2024-01-31"}"#).unwrap();
        assert_eq!(
            set.end_date,
            Some(NaiveDate::from_ymd_opt(2024, 1, 31))
        );
    }
}
