use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::job::{Job, JobUpdate};
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub id: i64,
    pub company: Option<i64>,
    pub job_logo: String,
    pub job_link: String,
    pub company_name: String,
    pub job_title: String,
    pub location: String,
    pub time_added: DateTime<Utc>,
    pub job_description: String,
    pub job_types: Vec<String>,
}

impl From<Job> for JobResponse {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            company: j.company_id,
            job_logo: j.job_logo,
            job_link: j.job_link,
            company_name: j.company_name,
            job_title: j.job_title,
            location: j.location,
            time_added: j.time_added,
            job_description: j.job_description,
            job_types: j.job_types,
        }
    }
}

/// Body of `POST /api/job` and `PUT /api/job/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobPayload {
    #[validate(url, length(max = 200))]
    pub job_logo: String,
    #[validate(url, length(max = 200))]
    pub job_link: String,
    /// Defaults to the posting company's name.
    #[validate(length(max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub job_title: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub location: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub job_description: String,
    pub job_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct JobPatchPayload {
    #[validate(url, length(max = 200))]
    pub job_logo: Option<String>,
    #[validate(url, length(max = 200))]
    pub job_link: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub job_title: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub location: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub job_description: Option<String>,
    pub job_types: Option<Vec<String>>,
}

impl From<JobPatchPayload> for JobUpdate {
    fn from(p: JobPatchPayload) -> Self {
        Self {
            job_logo: p.job_logo,
            job_link: p.job_link,
            company_name: p.company_name,
            job_title: p.job_title,
            location: p.location,
            job_description: p.job_description,
        }
    }
}
