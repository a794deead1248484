use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: i64,
    pub talent_id: i64,
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
}

#[derive(Debug, Clone)]
pub struct NewExperience {
    pub talent_id: i64,
    pub project_logo: String,
    pub company_name: String,
    pub role: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub currently_working: bool,
    pub twitter_link: String,
    pub discord_link: String,
}

/// Partial update. `end_date` is nested so a caller can clear it.
#[derive(Debug, Clone, Default)]
pub struct ExperienceUpdate {
    pub project_logo: Option<String>,
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub currently_working: Option<bool>,
    pub twitter_link: Option<String>,
    pub discord_link: Option<String>,
}

impl Experience {
    pub fn apply(&mut self, update: ExperienceUpdate) {
        if let Some(v) = update.project_logo {
            self.project_logo = v;
        }
        if let Some(v) = update.company_name {
            self.company_name = v;
        }
        if let Some(v) = update.role {
            self.role = v;
        }
        if let Some(v) = update.description {
            self.description = v;
        }
        if let Some(v) = update.start_date {
            self.start_date = v;
        }
        if let Some(v) = update.end_date {
            self.end_date = v;
        }
        if let Some(v) = update.currently_working {
            self.currently_working = v;
        }
        if let Some(v) = update.twitter_link {
            self.twitter_link = v;
        }
        if let Some(v) = update.discord_link {
            self.discord_link = v;
        }
    }
}
