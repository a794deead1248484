use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Talent {
    pub id: i64,
    pub avatar: String,
    pub username: String,
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
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Fields needed to create a talent on first sign-in.
#[derive(Debug, Clone, Default)]
pub struct NewTalent {
    pub id: i64,
    pub avatar: String,
    pub username: String,
    pub global_name: String,
    pub language: String,
    pub email: Option<String>,
    pub discord_profile: Option<String>,
    pub twitter_profile: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TalentUpdate {
    pub avatar: Option<String>,
    pub username: Option<String>,
    pub global_name: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
    pub about_me: Option<String>,
    pub summary: Option<String>,
    pub email: Option<String>,
    pub discord_profile: Option<String>,
    pub twitter_profile: Option<String>,
    pub phone_number: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentSort {
    /// Highest average review rating first.
    MostExperienced,
    LeastExperienced,
}

#[derive(Debug, Clone, Default)]
pub struct TalentFilter {
    /// Lower-cased skill names; a talent matches when it has any of them.
    pub skills: Vec<String>,
    pub sort: Option<TalentSort>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UniqueProfileVisit {
    pub talent_id: i64,
    pub session_key: String,
    pub visit_date: DateTime<Utc>,
}
