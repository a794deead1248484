use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::Result;
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

const TALENT_COLUMNS: &str = "id, avatar, username, global_name, timezone, language, about_me, summary, profile_visits, email, discord_profile, twitter_profile, phone_number, date_joined, last_login";

const COMPANY_COLUMNS: &str = "id, email, name, password_hash, is_active, date_joined";

const JOB_SELECT: &str = "SELECT id, company_id, job_logo, job_link, company_name, job_title, location, time_added, job_description,
        ARRAY(
            SELECT jt.name FROM job_job_types jjt
            JOIN job_types jt ON jt.id = jjt.job_type_id
            WHERE jjt.job_id = j.id
            ORDER BY jt.name
        )::text[] AS job_types
    FROM jobs j";

const EXPERIENCE_COLUMNS: &str = "id, talent_id, project_logo, company_name, role, description, start_date, end_date, currently_working, verified, twitter_link, discord_link";

const REVIEW_COLUMNS: &str =
    "id, talent_id, company_id, reviewer_name, reviewer_organization, review, rating, created_at";

const TALENT_SKILL_MATCH: &str = "(cardinality($1::text[]) = 0 OR EXISTS (
        SELECT 1 FROM talent_skills ts
        JOIN skills s ON s.id = ts.skill_id
        WHERE ts.talent_id = t.id AND LOWER(s.name) = ANY($1)
    ))";

const JOB_TYPE_MATCH: &str = "(cardinality($1::text[]) = 0 OR EXISTS (
        SELECT 1 FROM job_job_types jjt
        JOIN job_types jt ON jt.id = jjt.job_type_id
        WHERE jjt.job_id = j.id AND LOWER(jt.name) = ANY($1)
    ))";

/// PostgreSQL adapter for [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn get_or_create_skill(tx: &mut Transaction<'_, Postgres>, name: &str) -> Result<Skill> {
        let skill = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(skill)
    }

    async fn get_or_create_job_type(
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<JobType> {
        let job_type = sqlx::query_as::<_, JobType>(
            r#"
            INSERT INTO job_types (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;
        Ok(job_type)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_talent(&self, id: i64) -> Result<Option<Talent>> {
        let talent = sqlx::query_as::<_, Talent>(&format!(
            "SELECT {} FROM talents WHERE id = $1",
            TALENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(talent)
    }

    async fn get_talents(&self, ids: &[i64]) -> Result<Vec<Talent>> {
        let talents = sqlx::query_as::<_, Talent>(&format!(
            "SELECT {} FROM talents WHERE id = ANY($1) ORDER BY id",
            TALENT_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;
        Ok(talents)
    }

    async fn insert_talent(&self, talent: NewTalent) -> Result<Talent> {
        let created = sqlx::query_as::<_, Talent>(&format!(
            r#"
            INSERT INTO talents (
                id, avatar, username, global_name, language,
                email, discord_profile, twitter_profile, last_login
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            TALENT_COLUMNS
        ))
        .bind(talent.id)
        .bind(talent.avatar)
        .bind(talent.username)
        .bind(talent.global_name)
        .bind(talent.language)
        .bind(talent.email)
        .bind(talent.discord_profile)
        .bind(talent.twitter_profile)
        .bind(talent.last_login)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_talent(&self, id: i64, update: TalentUpdate) -> Result<Talent> {
        let talent = sqlx::query_as::<_, Talent>(&format!(
            r#"
            UPDATE talents
            SET
                avatar = COALESCE($2, avatar),
                username = COALESCE($3, username),
                global_name = COALESCE($4, global_name),
                timezone = COALESCE($5, timezone),
                language = COALESCE($6, language),
                about_me = COALESCE($7, about_me),
                summary = COALESCE($8, summary),
                email = COALESCE($9, email),
                discord_profile = COALESCE($10, discord_profile),
                twitter_profile = COALESCE($11, twitter_profile),
                phone_number = COALESCE($12, phone_number),
                last_login = COALESCE($13, last_login)
            WHERE id = $1
            RETURNING {}
            "#,
            TALENT_COLUMNS
        ))
        .bind(id)
        .bind(update.avatar)
        .bind(update.username)
        .bind(update.global_name)
        .bind(update.timezone)
        .bind(update.language)
        .bind(update.about_me)
        .bind(update.summary)
        .bind(update.email)
        .bind(update.discord_profile)
        .bind(update.twitter_profile)
        .bind(update.phone_number)
        .bind(update.last_login)
        .fetch_one(&self.pool)
        .await?;
        Ok(talent)
    }

    async fn delete_talent(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM talents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_talents(
        &self,
        filter: &TalentFilter,
        window: PageWindow,
    ) -> Result<Paged<Talent>> {
        let order_by = match filter.sort {
            None => "id ASC",
            Some(TalentSort::MostExperienced) => {
                "(SELECT AVG(r.rating) FROM reviews r WHERE r.talent_id = t.id) DESC NULLS LAST, id ASC"
            }
            Some(TalentSort::LeastExperienced) => {
                "(SELECT AVG(r.rating) FROM reviews r WHERE r.talent_id = t.id) ASC NULLS LAST, id ASC"
            }
        };

        let items_query = format!(
            "SELECT {} FROM talents t WHERE {} ORDER BY {} LIMIT $2 OFFSET $3",
            TALENT_COLUMNS, TALENT_SKILL_MATCH, order_by
        );
        let items = sqlx::query_as::<_, Talent>(&items_query)
            .bind(filter.skills.clone())
            .bind(window.limit)
            .bind(window.offset)
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM talents t WHERE {}",
            TALENT_SKILL_MATCH
        ))
        .bind(filter.skills.clone())
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged { items, total })
    }

    async fn record_unique_visit(&self, talent_id: i64, session_key: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            r#"
            INSERT INTO unique_profile_visits (talent_id, session_key)
            VALUES ($1, $2)
            ON CONFLICT (talent_id, session_key) DO NOTHING
            "#,
        )
        .bind(talent_id)
        .bind(session_key)
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        if inserted {
            sqlx::query("UPDATE talents SET profile_visits = profile_visits + 1 WHERE id = $1")
                .bind(talent_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(inserted)
    }

    async fn average_rating(&self, talent_id: i64) -> Result<Option<f64>> {
        let avg = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(rating)::float8 FROM reviews WHERE talent_id = $1",
        )
        .bind(talent_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(avg)
    }

    async fn talent_skills(&self, talent_id: i64) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>(
            r#"
            SELECT s.id, s.name FROM skills s
            JOIN talent_skills ts ON ts.skill_id = s.id
            WHERE ts.talent_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(talent_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(skills)
    }

    async fn replace_talent_skills(&self, talent_id: i64, names: &[String]) -> Result<Vec<Skill>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM talent_skills WHERE talent_id = $1")
            .bind(talent_id)
            .execute(&mut *tx)
            .await?;

        let mut skills = Vec::with_capacity(names.len());
        for name in names {
            let skill = Self::get_or_create_skill(&mut tx, name).await?;
            sqlx::query(
                "INSERT INTO talent_skills (talent_id, skill_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(talent_id)
            .bind(skill.id)
            .execute(&mut *tx)
            .await?;
            skills.push(skill);
        }
        tx.commit().await?;

        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn list_skills(&self) -> Result<Vec<Skill>> {
        let skills = sqlx::query_as::<_, Skill>("SELECT id, name FROM skills ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(skills)
    }

    async fn insert_company(&self, company: NewCompany) -> Result<Company> {
        let created = sqlx::query_as::<_, Company>(&format!(
            "INSERT INTO companies (email, name, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            COMPANY_COLUMNS
        ))
        .bind(company.email)
        .bind(company.name)
        .bind(company.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn get_company(&self, id: i64) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = $1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn get_company_by_email(&self, email: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE email = $1",
            COMPANY_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn get_job(&self, id: i64) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!("{} WHERE j.id = $1", JOB_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn insert_job(&self, job: NewJob) -> Result<Job> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO jobs (company_id, job_logo, job_link, company_name, job_title, location, job_description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(job.company_id)
        .bind(job.job_logo)
        .bind(job.job_link)
        .bind(job.company_name)
        .bind(job.job_title)
        .bind(job.location)
        .bind(job.job_description)
        .fetch_one(&self.pool)
        .await?;

        let created = sqlx::query_as::<_, Job>(&format!("{} WHERE j.id = $1", JOB_SELECT))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_job(&self, id: i64, update: JobUpdate) -> Result<Job> {
        sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE jobs
            SET
                job_logo = COALESCE($2, job_logo),
                job_link = COALESCE($3, job_link),
                company_name = COALESCE($4, company_name),
                job_title = COALESCE($5, job_title),
                location = COALESCE($6, location),
                job_description = COALESCE($7, job_description),
                time_added = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(update.job_logo)
        .bind(update.job_link)
        .bind(update.company_name)
        .bind(update.job_title)
        .bind(update.location)
        .bind(update.job_description)
        .fetch_one(&self.pool)
        .await?;

        let job = sqlx::query_as::<_, Job>(&format!("{} WHERE j.id = $1", JOB_SELECT))
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(job)
    }

    async fn delete_job(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_jobs(&self, job_types: &[String], window: PageWindow) -> Result<Paged<Job>> {
        let items = sqlx::query_as::<_, Job>(&format!(
            "{} WHERE {} ORDER BY time_added DESC, id DESC LIMIT $2 OFFSET $3",
            JOB_SELECT, JOB_TYPE_MATCH
        ))
        .bind(job_types.to_vec())
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM jobs j WHERE {}",
            JOB_TYPE_MATCH
        ))
        .bind(job_types.to_vec())
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged { items, total })
    }

    async fn job_types_for(&self, job_id: i64) -> Result<Vec<JobType>> {
        let job_types = sqlx::query_as::<_, JobType>(
            r#"
            SELECT jt.id, jt.name FROM job_types jt
            JOIN job_job_types jjt ON jjt.job_type_id = jt.id
            WHERE jjt.job_id = $1
            ORDER BY jt.name
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(job_types)
    }

    async fn replace_job_types(&self, job_id: i64, names: &[String]) -> Result<Vec<JobType>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM job_job_types WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;

        let mut job_types = Vec::with_capacity(names.len());
        for name in names {
            let job_type = Self::get_or_create_job_type(&mut tx, name).await?;
            sqlx::query(
                "INSERT INTO job_job_types (job_id, job_type_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(job_id)
            .bind(job_type.id)
            .execute(&mut *tx)
            .await?;
            job_types.push(job_type);
        }
        tx.commit().await?;

        job_types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(job_types)
    }

    async fn list_job_types(&self) -> Result<Vec<JobType>> {
        let job_types =
            sqlx::query_as::<_, JobType>("SELECT id, name FROM job_types ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(job_types)
    }

    async fn get_experience(&self, id: i64) -> Result<Option<Experience>> {
        let experience = sqlx::query_as::<_, Experience>(&format!(
            "SELECT {} FROM experiences WHERE id = $1",
            EXPERIENCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(experience)
    }

    async fn insert_experience(&self, experience: NewExperience) -> Result<Experience> {
        let created = sqlx::query_as::<_, Experience>(&format!(
            r#"
            INSERT INTO experiences (
                talent_id, project_logo, company_name, role, description,
                start_date, end_date, currently_working, twitter_link, discord_link
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            EXPERIENCE_COLUMNS
        ))
        .bind(experience.talent_id)
        .bind(experience.project_logo)
        .bind(experience.company_name)
        .bind(experience.role)
        .bind(experience.description)
        .bind(experience.start_date)
        .bind(experience.end_date)
        .bind(experience.currently_working)
        .bind(experience.twitter_link)
        .bind(experience.discord_link)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_experience(&self, id: i64, update: ExperienceUpdate) -> Result<Experience> {
        let clear_or_set_end = update.end_date.is_some();
        let experience = sqlx::query_as::<_, Experience>(&format!(
            r#"
            UPDATE experiences
            SET
                project_logo = COALESCE($2, project_logo),
                company_name = COALESCE($3, company_name),
                role = COALESCE($4, role),
                description = COALESCE($5, description),
                start_date = COALESCE($6, start_date),
                end_date = CASE WHEN $7 THEN $8 ELSE end_date END,
                currently_working = COALESCE($9, currently_working),
                twitter_link = COALESCE($10, twitter_link),
                discord_link = COALESCE($11, discord_link)
            WHERE id = $1
            RETURNING {}
            "#,
            EXPERIENCE_COLUMNS
        ))
        .bind(id)
        .bind(update.project_logo)
        .bind(update.company_name)
        .bind(update.role)
        .bind(update.description)
        .bind(update.start_date)
        .bind(clear_or_set_end)
        .bind(update.end_date.flatten())
        .bind(update.currently_working)
        .bind(update.twitter_link)
        .bind(update.discord_link)
        .fetch_one(&self.pool)
        .await?;
        Ok(experience)
    }

    async fn delete_experience(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM experiences WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_experiences(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<Experience>> {
        let items = sqlx::query_as::<_, Experience>(&format!(
            r#"
            SELECT {} FROM experiences
            WHERE ($1::bigint IS NULL OR talent_id = $1)
            ORDER BY start_date DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            EXPERIENCE_COLUMNS
        ))
        .bind(talent_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM experiences WHERE ($1::bigint IS NULL OR talent_id = $1)",
        )
        .bind(talent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged { items, total })
    }

    async fn get_review(&self, id: i64) -> Result<Option<Review>> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {} FROM reviews WHERE id = $1",
            REVIEW_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(review)
    }

    async fn insert_review(&self, review: NewReview) -> Result<Review> {
        let created = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (talent_id, company_id, reviewer_name, reviewer_organization, review, rating)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        ))
        .bind(review.talent_id)
        .bind(review.company_id)
        .bind(review.reviewer_name)
        .bind(review.reviewer_organization)
        .bind(review.review)
        .bind(review.rating)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_reviews(
        &self,
        talent_id: Option<i64>,
        window: PageWindow,
    ) -> Result<Paged<Review>> {
        let items = sqlx::query_as::<_, Review>(&format!(
            r#"
            SELECT {} FROM reviews
            WHERE ($1::bigint IS NULL OR talent_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            REVIEW_COLUMNS
        ))
        .bind(talent_id)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reviews WHERE ($1::bigint IS NULL OR talent_id = $1)",
        )
        .bind(talent_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Paged { items, total })
    }

    async fn save_pending_login(&self, login: &PendingLogin) -> Result<()> {
        sqlx::query(
            "INSERT INTO pending_logins (state, code_verifier, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&login.state)
        .bind(&login.code_verifier)
        .bind(login.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn take_pending_login(&self, state: &str) -> Result<Option<PendingLogin>> {
        let login = sqlx::query_as::<_, PendingLogin>(
            "DELETE FROM pending_logins WHERE state = $1 RETURNING state, code_verifier, created_at",
        )
        .bind(state)
        .fetch_optional(&self.pool)
        .await?;
        Ok(login)
    }

    async fn purge_pending_logins(&self, older_than: DateTime<Utc>) -> Result<u64> {
        let res = sqlx::query("DELETE FROM pending_logins WHERE created_at < $1")
            .bind(older_than)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
