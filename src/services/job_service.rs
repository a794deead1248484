use tracing::info;
use validator::Validate;

use crate::database::{DynStore, PageWindow, Paged};
use crate::dto::{
    job_dto::{JobPatchPayload, JobPayload},
    JsonBody, NamesPayload,
};
use crate::error::{Error, Result};
use crate::models::{
    company::Company,
    job::{Job, JobUpdate, NewJob},
    skill::JobType,
};

/// Checked before any row is written, so a bad name never leaves a job
/// half-saved.
fn normalize_types(names: Option<&[String]>) -> Result<Option<Vec<String>>> {
    names
        .map(|names| {
            NamesPayload {
                name: names.to_vec(),
            }
            .normalized()
        })
        .transpose()
}

#[derive(Clone)]
pub struct JobService {
    store: DynStore,
}

impl JobService {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// `job_types` are matched case-insensitively; newest jobs first.
    pub async fn list(&self, job_types: &[String], window: PageWindow) -> Result<Paged<Job>> {
        let names: Vec<String> = job_types.iter().map(|n| n.to_lowercase()).collect();
        self.store.list_jobs(&names, window).await
    }

    pub async fn get(&self, id: i64) -> Result<Job> {
        self.store
            .get_job(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))
    }

    async fn owned(&self, company: &Company, id: i64) -> Result<Job> {
        let job = self.get(id).await?;
        if job.company_id != Some(company.id) {
            return Err(Error::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            ));
        }
        Ok(job)
    }

    pub async fn create(&self, company: &Company, payload: JobPayload) -> Result<Job> {
        payload.validate()?;
        let job_types = normalize_types(payload.job_types.as_deref())?;
        let company_name = payload
            .company_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| company.name.clone());
        let job = self
            .store
            .insert_job(NewJob {
                company_id: Some(company.id),
                job_logo: payload.job_logo,
                job_link: payload.job_link,
                company_name,
                job_title: payload.job_title,
                location: payload.location,
                job_description: payload.job_description,
            })
            .await?;
        info!(job_id = job.id, company_id = company.id, "job posted");

        match job_types {
            Some(names) => self.set_job_types(job.id, &names).await,
            None => Ok(job),
        }
    }

    /// Full replacement (`PUT`).
    pub async fn replace(&self, company: &Company, id: i64, body: JsonBody) -> Result<Job> {
        self.owned(company, id).await?;
        let payload: JobPayload = body.parse()?;
        payload.validate()?;
        let job_types = normalize_types(payload.job_types.as_deref())?;
        let update = JobUpdate {
            job_logo: Some(payload.job_logo),
            job_link: Some(payload.job_link),
            company_name: Some(
                payload
                    .company_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| company.name.clone()),
            ),
            job_title: Some(payload.job_title),
            location: Some(payload.location),
            job_description: Some(payload.job_description),
        };
        let job = self.store.update_job(id, update).await?;
        match job_types {
            Some(names) => self.set_job_types(job.id, &names).await,
            None => Ok(job),
        }
    }

    pub async fn patch(&self, company: &Company, id: i64, body: JsonBody) -> Result<Job> {
        self.owned(company, id).await?;
        let payload: JobPatchPayload = body.parse()?;
        payload.validate()?;
        let job_types = normalize_types(payload.job_types.as_deref())?;
        let job = self.store.update_job(id, payload.into()).await?;
        match job_types {
            Some(names) => self.set_job_types(job.id, &names).await,
            None => Ok(job),
        }
    }

    pub async fn delete(&self, company: &Company, id: i64) -> Result<()> {
        self.owned(company, id).await?;
        self.store.delete_job(id).await?;
        info!(job_id = id, "job deleted");
        Ok(())
    }

    pub async fn job_types(&self, id: i64) -> Result<Vec<JobType>> {
        self.get(id).await?;
        self.store.job_types_for(id).await
    }

    pub async fn replace_job_types(
        &self,
        company: &Company,
        id: i64,
        body: JsonBody,
    ) -> Result<Vec<JobType>> {
        self.owned(company, id).await?;
        let names = body.parse::<NamesPayload>()?.normalized()?;
        self.store.replace_job_types(id, &names).await
    }

    pub async fn list_job_types(&self) -> Result<Vec<JobType>> {
        self.store.list_job_types().await
    }

    async fn set_job_types(&self, id: i64, names: &[String]) -> Result<Job> {
        self.store.replace_job_types(id, names).await?;
        self.get(id).await
    }
}
