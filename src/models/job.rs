use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub company_id: Option<i64>,
    pub job_logo: String,
    pub job_link: String,
    pub company_name: String,
    pub job_title: String,
    pub location: String,
    pub time_added: DateTime<Utc>,
    pub job_description: String,
    /// Names of the attached job types, ordered by name.
    pub job_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub company_id: Option<i64>,
    pub job_logo: String,
    pub job_link: String,
    pub company_name: String,
    pub job_title: String,
    pub location: String,
    pub job_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub job_logo: Option<String>,
    pub job_link: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub job_description: Option<String>,
}
