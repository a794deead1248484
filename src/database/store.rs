use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::models::{
    company::{Company, NewCompany},
    experience::{Experience, ExperienceUpdate, NewExperience},
    job::{Job, JobUpdate, NewJob},
    pending_login::PendingLogin,
    review::{NewReview, Review},
    skill::{JobType, Skill},
    talent::{NewTalent, Talent, TalentFilter, TalentUpdate},
};

use super::{memory::MemoryStore, pool, postgres::PgStore};

/// LIMIT/OFFSET pair handed to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    pub fn all() -> Self {
        Self {
            limit: i64::MAX,
            offset: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Persistence port shared by every service.
///
/// Name matching for skill and job type filters is case-insensitive; callers
/// pass the names already lower-cased. `replace_*` operations get-or-create
/// each name (exact match) and swap the whole set in one step.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn get_talent(&self, id: i64) -> Result<Option<Talent>>;
    async fn get_talents(&self, ids: &[i64]) -> Result<Vec<Talent>>;
    async fn insert_talent(&self, talent: NewTalent) -> Result<Talent>;
    async fn update_talent(&self, id: i64, update: TalentUpdate) -> Result<Talent>;
    async fn delete_talent(&self, id: i64) -> Result<bool>;
    async fn list_talents(&self, filter: &TalentFilter, window: PageWindow)
        -> Result<Paged<Talent>>;
    /// Returns true when this session had not visited the talent before, in
    /// which case the visit counter was incremented as well.
    async fn record_unique_visit(&self, talent_id: i64, session_key: &str) -> Result<bool>;
    async fn average_rating(&self, talent_id: i64) -> Result<Option<f64>>;
    async fn talent_skills(&self, talent_id: i64) -> Result<Vec<Skill>>;
    async fn replace_talent_skills(&self, talent_id: i64, names: &[String]) -> Result<Vec<Skill>>;
    async fn list_skills(&self) -> Result<Vec<Skill>>;

    async fn insert_company(&self, company: NewCompany) -> Result<Company>;
    async fn get_company(&self, id: i64) -> Result<Option<Company>>;
    async fn get_company_by_email(&self, email: &str) -> Result<Option<Company>>;

    async fn get_job(&self, id: i64) -> Result<Option<Job>>;
    async fn insert_job(&self, job: NewJob) -> Result<Job>;
    async fn update_job(&self, id: i64, update: JobUpdate) -> Result<Job>;
    async fn delete_job(&self, id: i64) -> Result<bool>;
    async fn list_jobs(&self, job_types: &[String], window: PageWindow) -> Result<Paged<Job>>;
    async fn job_types_for(&self, job_id: i64) -> Result<Vec<JobType>>;
    async fn replace_job_types(&self, job_id: i64, names: &[String]) -> Result<Vec<JobType>>;
    async fn list_job_types(&self) -> Result<Vec<JobType>>;

    async fn get_experience(&self, id: i64) -> Result<Option<Experience>>;
    async fn insert_experience(&self, experience: NewExperience) -> Result<Experience>;
    async fn update_experience(&self, id: i64, update: ExperienceUpdate) -> Result<Experience>;
    async fn delete_experience(&self, id: i64) -> Result<bool>;
    async fn list_experiences(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<Experience>>;

    async fn get_review(&self, id: i64) -> Result<Option<Review>>;
    async fn insert_review(&self, review: NewReview) -> Result<Review>;
    async fn list_reviews(&self, talent_id: Option<i64>, window: PageWindow)
        -> Result<Paged<Review>>;

    async fn save_pending_login(&self, login: &PendingLogin) -> Result<()>;
    /// Removes and returns the pending login for `state`, if any.
    async fn take_pending_login(&self, state: &str) -> Result<Option<PendingLogin>>;
    async fn purge_pending_logins(&self, older_than: DateTime<Utc>) -> Result<u64>;
}

pub type DynStore = Arc<dyn Store>;

/// Picks a backend from the URL scheme.
///
/// - `memory://...` -> process-local [`MemoryStore`]
/// - anything else -> PostgreSQL, with migrations applied
pub async fn create_store(database_url: &str) -> Result<DynStore> {
    if database_url.starts_with("memory://") {
        info!("Using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = pool::create_pool(database_url).await?;
    pool::run_migrations(&pool).await?;
    info!("Connected to PostgreSQL store");
    Ok(Arc::new(PgStore::new(pool)))
}
