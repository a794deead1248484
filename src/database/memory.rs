use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::{
    company::{Company, NewCompany},
    experience::{Experience, ExperienceUpdate, NewExperience},
    job::{Job, JobUpdate, NewJob},
    pending_login::PendingLogin,
    review::{NewReview, Review},
    skill::{JobType, Skill},
    talent::{NewTalent, Talent, TalentFilter, TalentSort, TalentUpdate},
};

use super::store::{PageWindow, Paged, Store};

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    talents: BTreeMap<i64, Talent>,
    skills: BTreeMap<i64, Skill>,
    talent_skills: BTreeSet<(i64, i64)>,
    visits: BTreeMap<(i64, String), DateTime<Utc>>,
    companies: BTreeMap<i64, Company>,
    jobs: BTreeMap<i64, Job>,
    job_types: BTreeMap<i64, JobType>,
    job_job_types: BTreeSet<(i64, i64)>,
    experiences: BTreeMap<i64, Experience>,
    reviews: BTreeMap<i64, Review>,
    pending_logins: HashMap<String, PendingLogin>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn average_rating(&self, talent_id: i64) -> Option<f64> {
        let ratings: Vec<i32> = self
            .reviews
            .values()
            .filter(|r| r.talent_id == talent_id)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return None;
        }
        Some(ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64)
    }

    fn skills_of(&self, talent_id: i64) -> Vec<Skill> {
        let mut skills: Vec<Skill> = self
            .talent_skills
            .range((talent_id, i64::MIN)..=(talent_id, i64::MAX))
            .filter_map(|(_, skill_id)| self.skills.get(skill_id).cloned())
            .collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        skills
    }

    fn job_types_of(&self, job_id: i64) -> Vec<JobType> {
        let mut job_types: Vec<JobType> = self
            .job_job_types
            .range((job_id, i64::MIN)..=(job_id, i64::MAX))
            .filter_map(|(_, type_id)| self.job_types.get(type_id).cloned())
            .collect();
        job_types.sort_by(|a, b| a.name.cmp(&b.name));
        job_types
    }

    fn hydrate_job(&self, job: &Job) -> Job {
        let mut job = job.clone();
        job.job_types = self
            .job_types_of(job.id)
            .into_iter()
            .map(|jt| jt.name)
            .collect();
        job
    }

    fn get_or_create_skill(&mut self, name: &str) -> Skill {
        if let Some(skill) = self.skills.values().find(|s| s.name == name) {
            return skill.clone();
        }
        let skill = Skill {
            id: self.allocate_id(),
            name: name.to_string(),
        };
        self.skills.insert(skill.id, skill.clone());
        skill
    }

    fn get_or_create_job_type(&mut self, name: &str) -> JobType {
        if let Some(job_type) = self.job_types.values().find(|jt| jt.name == name) {
            return job_type.clone();
        }
        let job_type = JobType {
            id: self.allocate_id(),
            name: name.to_string(),
        };
        self.job_types.insert(job_type.id, job_type.clone());
        job_type
    }
}

fn page<T>(items: Vec<T>, window: PageWindow) -> Paged<T> {
    let total = items.len() as i64;
    let offset = usize::try_from(window.offset.max(0)).unwrap_or(usize::MAX);
    let limit = usize::try_from(window.limit.max(0)).unwrap_or(usize::MAX);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Paged { items, total }
}

fn not_found(what: &str) -> Error {
    Error::NotFound(format!("{} not found", what))
}

/// Process-local [`Store`] used by tests and `memory://` deployments.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get_talent(&self, id: i64) -> Result<Option<Talent>> {
        Ok(self.state.read().await.talents.get(&id).cloned())
    }

    async fn get_talents(&self, ids: &[i64]) -> Result<Vec<Talent>> {
        let state = self.state.read().await;
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.talents.get(&id).cloned())
            .collect())
    }

    async fn insert_talent(&self, talent: NewTalent) -> Result<Talent> {
        let mut state = self.state.write().await;
        if state.talents.contains_key(&talent.id) {
            return Err(Error::Conflict(format!(
                "Talent {} already exists",
                talent.id
            )));
        }
        let created = Talent {
            id: talent.id,
            avatar: talent.avatar,
            username: talent.username,
            global_name: talent.global_name,
            timezone: "UTC".to_string(),
            language: talent.language,
            about_me: String::new(),
            summary: String::new(),
            profile_visits: 0,
            email: talent.email,
            discord_profile: talent.discord_profile,
            twitter_profile: talent.twitter_profile,
            phone_number: None,
            date_joined: Utc::now(),
            last_login: talent.last_login,
        };
        state.talents.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_talent(&self, id: i64, update: TalentUpdate) -> Result<Talent> {
        let mut state = self.state.write().await;
        let talent = state.talents.get_mut(&id).ok_or_else(|| not_found("Talent"))?;
        if let Some(v) = update.avatar {
            talent.avatar = v;
        }
        if let Some(v) = update.username {
            talent.username = v;
        }
        if let Some(v) = update.global_name {
            talent.global_name = v;
        }
        if let Some(v) = update.timezone {
            talent.timezone = v;
        }
        if let Some(v) = update.language {
            talent.language = v;
        }
        if let Some(v) = update.about_me {
            talent.about_me = v;
        }
        if let Some(v) = update.summary {
            talent.summary = v;
        }
        if update.email.is_some() {
            talent.email = update.email;
        }
        if update.discord_profile.is_some() {
            talent.discord_profile = update.discord_profile;
        }
        if update.twitter_profile.is_some() {
            talent.twitter_profile = update.twitter_profile;
        }
        if update.phone_number.is_some() {
            talent.phone_number = update.phone_number;
        }
        if update.last_login.is_some() {
            talent.last_login = update.last_login;
        }
        Ok(talent.clone())
    }

    async fn delete_talent(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.talents.remove(&id).is_none() {
            return Ok(false);
        }
        state.talent_skills.retain(|(talent_id, _)| *talent_id != id);
        state.visits.retain(|(talent_id, _), _| *talent_id != id);
        state.experiences.retain(|_, e| e.talent_id != id);
        state.reviews.retain(|_, r| r.talent_id != id);
        Ok(true)
    }

    async fn list_talents(
        &self,
        filter: &TalentFilter,
        window: PageWindow,
    ) -> Result<Paged<Talent>> {
        let state = self.state.read().await;
        let mut matched: Vec<(Option<f64>, Talent)> = state
            .talents
            .values()
            .filter(|t| {
                filter.skills.is_empty()
                    || state
                        .skills_of(t.id)
                        .iter()
                        .any(|s| filter.skills.contains(&s.name.to_lowercase()))
            })
            .map(|t| (state.average_rating(t.id), t.clone()))
            .collect();

        if let Some(sort) = filter.sort {
            // Unrated talents always go last, ties fall back to id order.
            matched.sort_by(|(a_avg, a), (b_avg, b)| match (a_avg, b_avg) {
                (Some(x), Some(y)) => {
                    let ord = match sort {
                        TalentSort::MostExperienced => y.total_cmp(x),
                        TalentSort::LeastExperienced => x.total_cmp(y),
                    };
                    ord.then(a.id.cmp(&b.id))
                }
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.id.cmp(&b.id),
            });
        }

        Ok(page(matched.into_iter().map(|(_, t)| t).collect(), window))
    }

    async fn record_unique_visit(&self, talent_id: i64, session_key: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.talents.contains_key(&talent_id) {
            return Err(not_found("Talent"));
        }
        let key = (talent_id, session_key.to_string());
        if state.visits.contains_key(&key) {
            return Ok(false);
        }
        state.visits.insert(key, Utc::now());
        if let Some(talent) = state.talents.get_mut(&talent_id) {
            talent.profile_visits += 1;
        }
        Ok(true)
    }

    async fn average_rating(&self, talent_id: i64) -> Result<Option<f64>> {
        Ok(self.state.read().await.average_rating(talent_id))
    }

    async fn talent_skills(&self, talent_id: i64) -> Result<Vec<Skill>> {
        Ok(self.state.read().await.skills_of(talent_id))
    }

    async fn replace_talent_skills(&self, talent_id: i64, names: &[String]) -> Result<Vec<Skill>> {
        let mut state = self.state.write().await;
        if !state.talents.contains_key(&talent_id) {
            return Err(not_found("Talent"));
        }
        state.talent_skills.retain(|(id, _)| *id != talent_id);
        for name in names {
            let skill = state.get_or_create_skill(name);
            state.talent_skills.insert((talent_id, skill.id));
        }
        Ok(state.skills_of(talent_id))
    }

    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let state = self.state.read().await;
        let mut skills: Vec<Skill> = state.skills.values().cloned().collect();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company> {
        let mut state = self.state.write().await;
        if state.companies.values().any(|c| c.email == company.email) {
            return Err(Error::Conflict("Resource already exists".to_string()));
        }
        let created = Company {
            id: state.allocate_id(),
            email: company.email,
            name: company.name,
            password_hash: company.password_hash,
            is_active: true,
            date_joined: Utc::now(),
        };
        state.companies.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        Ok(self.state.read().await.companies.get(&id).cloned())
    }

    async fn get_company_by_email(&self, email: &str) -> Result<Option<Company>> {
        Ok(self
            .state
            .read()
            .await
            .companies
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let state = self.state.read().await;
        Ok(state.jobs.get(&id).map(|job| state.hydrate_job(job)))
    }

    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        let mut state = self.state.write().await;
        let created = Job {
            id: state.allocate_id(),
            company_id: job.company_id,
            job_logo: job.job_logo,
            job_link: job.job_link,
            company_name: job.company_name,
            job_title: job.job_title,
            location: job.location,
            time_added: Utc::now(),
            job_description: job.job_description,
            job_types: Vec::new(),
        };
        state.jobs.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_job(&self, id: i64, update: JobUpdate) -> Result<Job> {
        let mut state = self.state.write().await;
        let job = state.jobs.get_mut(&id).ok_or_else(|| not_found("Job"))?;
        if let Some(v) = update.job_logo {
            job.job_logo = v;
        }
        if let Some(v) = update.job_link {
            job.job_link = v;
        }
        if let Some(v) = update.company_name {
            job.company_name = v;
        }
        if let Some(v) = update.job_title {
            job.job_title = v;
        }
        if let Some(v) = update.location {
            job.location = v;
        }
        if let Some(v) = update.job_description {
            job.job_description = v;
        }
        job.time_added = Utc::now();
        let job = job.clone();
        Ok(state.hydrate_job(&job))
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.jobs.remove(&id).is_none() {
            return Ok(false);
        }
        state.job_job_types.retain(|(job_id, _)| *job_id != id);
        Ok(true)
    }

    async fn list_jobs(&self, job_types: &[String], window: PageWindow) -> Result<Paged<Job>> {
        let state = self.state.read().await;
        let mut matched: Vec<Job> = state
            .jobs
            .values()
            .map(|job| state.hydrate_job(job))
            .filter(|job| {
                job_types.is_empty()
                    || job
                        .job_types
                        .iter()
                        .any(|name| job_types.contains(&name.to_lowercase()))
            })
            .collect();
        matched.sort_by(|a, b| b.time_added.cmp(&a.time_added).then(b.id.cmp(&a.id)));
        Ok(page(matched, window))
    }

    async fn job_types_for(&self, job_id: i64) -> Result<Vec<JobType>> {
        Ok(self.state.read().await.job_types_of(job_id))
    }

    async fn replace_job_types(&self, job_id: i64, names: &[String]) -> Result<Vec<JobType>> {
        let mut state = self.state.write().await;
        if !state.jobs.contains_key(&job_id) {
            return Err(not_found("Job"));
        }
        state.job_job_types.retain(|(id, _)| *id != job_id);
        for name in names {
            let job_type = state.get_or_create_job_type(name);
            state.job_job_types.insert((job_id, job_type.id));
        }
        Ok(state.job_types_of(job_id))
    }

    async fn list_job_types(&self) -> Result<Vec<JobType>> {
        let state = self.state.read().await;
        let mut job_types: Vec<JobType> = state.job_types.values().cloned().collect();
        job_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(job_types)
    }

    async fn get_experience(&self, id: i64) -> Result<Option<Experience>> {
        Ok(self.state.read().await.experiences.get(&id).cloned())
    }

    async fn insert_experience(&self, experience: NewExperience) -> Result<Experience> {
        let mut state = self.state.write().await;
        if !state.talents.contains_key(&experience.talent_id) {
            return Err(not_found("Talent"));
        }
        let created = Experience {
            id: state.allocate_id(),
            talent_id: experience.talent_id,
            project_logo: experience.project_logo,
            company_name: experience.company_name,
            role: experience.role,
            description: experience.description,
            start_date: experience.start_date,
            end_date: experience.end_date,
            currently_working: experience.currently_working,
            verified: false,
            twitter_link: experience.twitter_link,
            discord_link: experience.discord_link,
        };
        state.experiences.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_experience(&self, id: i64, update: ExperienceUpdate) -> Result<Experience> {
        let mut state = self.state.write().await;
        let experience = state
            .experiences
            .get_mut(&id)
            .ok_or_else(|| not_found("Experience"))?;
        experience.apply(update);
        Ok(experience.clone())
    }

    async fn delete_experience(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.experiences.remove(&id).is_some())
    }

    async fn list_experiences(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<Experience>> {
        let state = self.state.read().await;
        let mut matched: Vec<Experience> = state
            .experiences
            .values()
            .filter(|e| talent_id.map_or(true, |id| e.talent_id == id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        Ok(page(matched, window))
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>> {
        Ok(self.state.read().await.reviews.get(&id).cloned())
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let mut state = self.state.write().await;
        if !state.talents.contains_key(&review.talent_id) {
            return Err(not_found("Talent"));
        }
        let created = Review {
            id: state.allocate_id(),
            talent_id: review.talent_id,
            company_id: review.company_id,
            reviewer_name: review.reviewer_name,
            reviewer_organization: review.reviewer_organization,
            review: review.review,
            rating: review.rating,
            created_at: Utc::now(),
        };
        state.reviews.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_reviews(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<Review>> {
        let state = self.state.read().await;
        let mut matched: Vec<Review> = state
            .reviews
            .values()
            .filter(|r| talent_id.map_or(true, |id| r.talent_id == id))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(page(matched, window))
    }

    async fn save_pending_login(&self, login: &PendingLogin) -> Result<()> {
        let mut state = self.state.write().await;
        if state.pending_logins.contains_key(&login.state) {
            return Err(Error::Conflict("Login state already in use".to_string()));
        }
        state
            .pending_logins
            .insert(login.state.clone(), login.clone());
        Ok(())
    }

    async fn take_pending_login(&self, state: &str) -> Result<Option<PendingLogin>> {
        Ok(self.state.write().await.pending_logins.remove(state))
    }

    async fn purge_pending_logins(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.pending_logins.len();
        state
            .pending_logins
            .retain(|_, login| login.created_at >= older_than);
        Ok((before - state.pending_logins.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_talent(id: i64) -> NewTalent {
        NewTalent {
            id,
            username: format!("talent{}", id),
            ..NewTalent::default()
        }
    }

    #[tokio::test]
    async fn unique_visits_count_once_per_session() {
        let store = MemoryStore::new();
        store.insert_talent(new_talent(7)).await.unwrap();

        assert!(store.record_unique_visit(7, "abc").await.unwrap());
        assert!(!store.record_unique_visit(7, "abc").await.unwrap());
        assert!(store.record_unique_visit(7, "def").await.unwrap());

        let talent = store.get_talent(7).await.unwrap().unwrap();
        assert_eq!(talent.profile_visits, 2);
    }

    #[tokio::test]
    async fn replacing_skills_reuses_existing_rows() {
        let store = MemoryStore::new();
        store.insert_talent(new_talent(1)).await.unwrap();
        store.insert_talent(new_talent(2)).await.unwrap();

        let first = store
            .replace_talent_skills(1, &["Rust".to_string(), "Go".to_string()])
            .await
            .unwrap();
        let second = store
            .replace_talent_skills(2, &["Rust".to_string()])
            .await
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first[1].name, "Rust");
        assert_eq!(second[0].id, first[1].id);
        assert_eq!(store.list_skills().await.unwrap().len(), 2);

        let cleared = store.replace_talent_skills(1, &[]).await.unwrap();
        assert!(cleared.is_empty());
    }

    #[tokio::test]
    async fn deleting_talent_cascades() {
        let store = MemoryStore::new();
        store.insert_talent(new_talent(3)).await.unwrap();
        store
            .insert_review(NewReview {
                talent_id: 3,
                company_id: None,
                reviewer_name: "Ann".into(),
                reviewer_organization: "Acme".into(),
                review: "Great".into(),
                rating: 5,
            })
            .await
            .unwrap();

        assert!(store.delete_talent(3).await.unwrap());
        assert!(!store.delete_talent(3).await.unwrap());
        let reviews = store.list_reviews(None, PageWindow::all()).await.unwrap();
        assert_eq!(reviews.total, 0);
    }

    #[test]
    fn page_applies_offset_and_limit() {
        let paged = page(
            (1..=10).collect::<Vec<i32>>(),
            PageWindow {
                limit: 3,
                offset: 6,
            },
        );
        assert_eq!(paged.items, vec![7, 8, 9]);
        assert_eq!(paged.total, 10);
    }
}
