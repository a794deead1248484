use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::talent::{Talent, TalentUpdate};
use crate::utils::validation::{validate_not_blank, validate_phone, validate_timezone};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TalentResponse {
    pub id: i64,
    pub username: String,
    pub avatar: String,
    pub global_name: String,
    pub timezone: String,
    pub language: String,
    pub about_me: String,
    pub summary: String,
    pub profile_visits: i64,
    pub email: Option<String>,
    pub discord_profile: Option<String>,
    pub twitter_profile: Option<String>,
    pub phone_number: Option<String>,
}

impl From<Talent> for TalentResponse {
    fn from(t: Talent) -> Self {
        Self {
            id: t.id,
            username: t.username,
            avatar: t.avatar,
            global_name: t.global_name,
            timezone: t.timezone,
            language: t.language,
            about_me: t.about_me,
            summary: t.summary,
            profile_visits: t.profile_visits,
            email: t.email,
            discord_profile: t.discord_profile,
            twitter_profile: t.twitter_profile,
            phone_number: t.phone_number,
        }
    }
}

/// `PATCH /api/talent/:id`. Server-managed fields are not accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTalentPayload {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub username: Option<String>,
    #[validate(url, length(max = 200))]
    pub avatar: Option<String>,
    #[validate(length(max = 200))]
    pub global_name: Option<String>,
    #[validate(custom(function = "validate_timezone"))]
    pub timezone: Option<String>,
    #[validate(length(max = 200))]
    pub language: Option<String>,
    pub about_me: Option<String>,
    pub summary: Option<String>,
    #[validate(email, length(max = 200))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub discord_profile: Option<String>,
    #[validate(length(max = 200))]
    pub twitter_profile: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone_number: Option<String>,
}

impl From<UpdateTalentPayload> for TalentUpdate {
    fn from(p: UpdateTalentPayload) -> Self {
        Self {
            username: p.username,
            avatar: p.avatar,
            global_name: p.global_name,
            timezone: p.timezone,
            language: p.language,
            about_me: p.about_me,
            summary: p.summary,
            email: p.email,
            discord_profile: p.discord_profile,
            twitter_profile: p.twitter_profile,
            phone_number: p.phone_number,
            ..TalentUpdate::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UsernamePayload {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AboutMePayload {
    pub about_me: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SummaryPayload {
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LanguagePayload {
    #[validate(length(min = 1, max = 200))]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct TimezonePayload {
    #[validate(custom(function = "validate_timezone"))]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AvatarPayload {
    #[validate(url, length(max = 200))]
    pub avatar: String,
}

impl From<UsernamePayload> for TalentUpdate {
    fn from(p: UsernamePayload) -> Self {
        Self {
            username: Some(p.username),
            ..Self::default()
        }
    }
}

impl From<AboutMePayload> for TalentUpdate {
    fn from(p: AboutMePayload) -> Self {
        Self {
            about_me: Some(p.about_me),
            ..Self::default()
        }
    }
}

impl From<SummaryPayload> for TalentUpdate {
    fn from(p: SummaryPayload) -> Self {
        Self {
            summary: Some(p.summary),
            ..Self::default()
        }
    }
}

impl From<LanguagePayload> for TalentUpdate {
    fn from(p: LanguagePayload) -> Self {
        Self {
            language: Some(p.language),
            ..Self::default()
        }
    }
}

impl From<TimezonePayload> for TalentUpdate {
    fn from(p: TimezonePayload) -> Self {
        Self {
            timezone: Some(p.timezone),
            ..Self::default()
        }
    }
}

impl From<AvatarPayload> for TalentUpdate {
    fn from(p: AvatarPayload) -> Self {
        Self {
            avatar: Some(p.avatar),
            ..Self::default()
        }
    }
}

impl From<&Talent> for UsernamePayload {
    fn from(t: &Talent) -> Self {
        Self {
            username: t.username.clone(),
        }
    }
}

impl From<&Talent> for AboutMePayload {
    fn from(t: &Talent) -> Self {
        Self {
            about_me: t.about_me.clone(),
        }
    }
}

impl From<&Talent> for SummaryPayload {
    fn from(t: &Talent) -> Self {
        Self {
            summary: t.summary.clone(),
        }
    }
}

impl From<&Talent> for LanguagePayload {
    fn from(t: &Talent) -> Self {
        Self {
            language: t.language.clone(),
        }
    }
}

impl From<&Talent> for TimezonePayload {
    fn from(t: &Talent) -> Self {
        Self {
            timezone: t.timezone.clone(),
        }
    }
}

impl From<&Talent> for AvatarPayload {
    fn from(t: &Talent) -> Self {
        Self {
            avatar: t.avatar.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AverageRatingResponse {
    pub average_rating: Option<f64>,
}
