//! Behaviour every `Store` backend must share. The in-memory store always
//! runs; PostgreSQL runs when `TEST_DATABASE_URL` is set.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use talent_backend::{
    database::{create_store, DynStore, MemoryStore, PageWindow},
    error::Error,
    models::{
        company::NewCompany,
        experience::{ExperienceUpdate, NewExperience},
        job::{JobUpdate, NewJob},
        pending_login::PendingLogin,
        review::NewReview,
        talent::{NewTalent, TalentFilter, TalentSort, TalentUpdate},
    },
    utils::token::random_alphanumeric,
};

fn fresh_id() -> i64 {
    rand::thread_rng().gen_range(1_000_000..i64::MAX / 2)
}

async fn seed_talent(store: &DynStore, username: &str) -> i64 {
    let id = fresh_id();
    store
        .insert_talent(NewTalent {
            id,
            username: username.into(),
            language: "English".into(),
            ..NewTalent::default()
        })
        .await
        .unwrap();
    id
}

async fn review(store: &DynStore, talent_id: i64, rating: i32) {
    store
        .insert_review(NewReview {
            talent_id,
            company_id: None,
            reviewer_name: "Rev".into(),
            reviewer_organization: "Org".into(),
            review: "fine".into(),
            rating,
        })
        .await
        .unwrap();
}

async fn talents_and_visits(store: DynStore) {
    let id = seed_talent(&store, "ada").await;
    let err = store
        .insert_talent(NewTalent {
            id,
            username: "dupe".into(),
            ..NewTalent::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    let talent = store
        .update_talent(
            id,
            TalentUpdate {
                summary: Some("Rust".into()),
                ..TalentUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(talent.summary, "Rust");
    assert_eq!(talent.username, "ada");

    let session = random_alphanumeric(32);
    assert!(store.record_unique_visit(id, &session).await.unwrap());
    assert!(!store.record_unique_visit(id, &session).await.unwrap());
    assert!(store
        .record_unique_visit(id, &random_alphanumeric(32))
        .await
        .unwrap());
    assert_eq!(store.get_talent(id).await.unwrap().unwrap().profile_visits, 2);

    assert!(store.delete_talent(id).await.unwrap());
    assert!(!store.delete_talent(id).await.unwrap());
    assert!(store.get_talent(id).await.unwrap().is_none());
}

async fn skill_filter_and_rating_sort(store: DynStore) {
    let tag = random_alphanumeric(8).to_lowercase();
    let skill = format!("skill-{}", tag);
    let unrated = seed_talent(&store, "unrated").await;
    let low = seed_talent(&store, "low").await;
    let high = seed_talent(&store, "high").await;
    for id in [unrated, low, high] {
        store
            .replace_talent_skills(id, &[skill.clone(), format!("other-{}", tag)])
            .await
            .unwrap();
    }
    review(&store, low, 1).await;
    review(&store, high, 4).await;
    review(&store, high, 5).await;

    assert_eq!(store.average_rating(high).await.unwrap(), Some(4.5));
    assert_eq!(store.average_rating(unrated).await.unwrap(), None);

    let filter = |sort| TalentFilter {
        skills: vec![skill.clone()],
        sort: Some(sort),
    };
    let most = store
        .list_talents(&filter(TalentSort::MostExperienced), PageWindow::all())
        .await
        .unwrap();
    assert_eq!(most.total, 3, "two matching skills must not duplicate rows");
    let ids: Vec<i64> = most.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![high, low, unrated]);

    let least = store
        .list_talents(&filter(TalentSort::LeastExperienced), PageWindow::all())
        .await
        .unwrap();
    let ids: Vec<i64> = least.items.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![low, high, unrated]);

    let window = store
        .list_talents(
            &filter(TalentSort::MostExperienced),
            PageWindow { limit: 1, offset: 1 },
        )
        .await
        .unwrap();
    assert_eq!(window.total, 3);
    assert_eq!(window.items[0].id, low);

    let skills = store.talent_skills(high).await.unwrap();
    assert_eq!(skills.len(), 2);
    let replaced = store
        .replace_talent_skills(high, &[skill.clone()])
        .await
        .unwrap();
    assert_eq!(replaced.len(), 1);
    assert_eq!(replaced[0].name, skill);
}

async fn companies_and_jobs(store: DynStore) {
    let email = format!("hr-{}@acme.com", random_alphanumeric(10).to_lowercase());
    let company = store
        .insert_company(NewCompany {
            email: email.clone(),
            name: "Acme".into(),
            password_hash: "hash".into(),
        })
        .await
        .unwrap();
    assert!(company.is_active);
    let err = store
        .insert_company(NewCompany {
            email: email.clone(),
            name: "Again".into(),
            password_hash: "hash".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(
        store.get_company_by_email(&email).await.unwrap().unwrap().id,
        company.id
    );

    let job = store
        .insert_job(NewJob {
            company_id: Some(company.id),
            job_logo: "https://l".into(),
            job_link: "https://j".into(),
            company_name: "Acme".into(),
            job_title: "Engineer".into(),
            location: "Remote".into(),
            job_description: "Build".into(),
        })
        .await
        .unwrap();
    let tag = random_alphanumeric(8).to_lowercase();
    let kind = format!("Type-{}", tag);
    let types = store
        .replace_job_types(job.id, &[kind.clone()])
        .await
        .unwrap();
    assert_eq!(types[0].name, kind);

    let listed = store
        .list_jobs(&[kind.to_lowercase()], PageWindow::all())
        .await
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].job_types, vec![kind.clone()]);

    let updated = store
        .update_job(
            job.id,
            JobUpdate {
                job_title: Some("Lead".into()),
                ..JobUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.job_title, "Lead");
    assert_eq!(updated.location, "Remote");
    assert!(updated.time_added >= job.time_added);

    assert!(store.delete_job(job.id).await.unwrap());
    assert!(store.get_job(job.id).await.unwrap().is_none());
}

async fn experiences_cascade_with_talent(store: DynStore) {
    let talent = seed_talent(&store, "exp").await;
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let new = |start| NewExperience {
        talent_id: talent,
        project_logo: "https://p".into(),
        company_name: "Acme".into(),
        role: "Dev".into(),
        description: "Did".into(),
        start_date: start,
        end_date: None,
        currently_working: true,
        twitter_link: "https://t".into(),
        discord_link: "https://d".into(),
    };
    let older = store.insert_experience(new(date(2020, 1, 1))).await.unwrap();
    let newer = store.insert_experience(new(date(2022, 1, 1))).await.unwrap();
    assert!(!older.verified);

    let listed = store
        .list_experiences(Some(talent), PageWindow::all())
        .await
        .unwrap();
    let ids: Vec<i64> = listed.items.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let ended = store
        .update_experience(
            older.id,
            ExperienceUpdate {
                end_date: Some(Some(date(2021, 1, 1))),
                currently_working: Some(false),
                ..ExperienceUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ended.end_date, Some(date(2021, 1, 1)));
    assert_eq!(ended.role, "Dev");

    review(&store, talent, 3).await;
    store.delete_talent(talent).await.unwrap();
    assert!(store.get_experience(newer.id).await.unwrap().is_none());
    let reviews = store
        .list_reviews(Some(talent), PageWindow::all())
        .await
        .unwrap();
    assert_eq!(reviews.total, 0);

    let err = store
        .insert_experience(new(date(2023, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

async fn pending_logins_are_single_use(store: DynStore) {
    let fresh = PendingLogin {
        state: random_alphanumeric(32),
        code_verifier: random_alphanumeric(64),
        created_at: Utc::now(),
    };
    let stale = PendingLogin {
        state: random_alphanumeric(32),
        code_verifier: random_alphanumeric(64),
        created_at: Utc::now() - Duration::minutes(30),
    };
    store.save_pending_login(&fresh).await.unwrap();
    store.save_pending_login(&stale).await.unwrap();

    let purged = store
        .purge_pending_logins(Utc::now() - Duration::minutes(PendingLogin::TTL_MINUTES))
        .await
        .unwrap();
    assert!(purged >= 1);
    assert!(store.take_pending_login(&stale.state).await.unwrap().is_none());

    let taken = store.take_pending_login(&fresh.state).await.unwrap().unwrap();
    assert_eq!(taken.code_verifier, fresh.code_verifier);
    assert!(store.take_pending_login(&fresh.state).await.unwrap().is_none());
}

async fn run_contract(store: DynStore) {
    store.ping().await.unwrap();
    talents_and_visits(store.clone()).await;
    skill_filter_and_rating_sort(store.clone()).await;
    companies_and_jobs(store.clone()).await;
    experiences_cascade_with_talent(store.clone()).await;
    pending_logins_are_single_use(store).await;
}

#[tokio::test]
async fn memory_store_contract() {
    run_contract(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn memory_urls_select_the_memory_store() {
    let store = create_store("memory://").await.unwrap();
    run_contract(store).await;
}

#[tokio::test]
async fn postgres_store_contract() {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let store = create_store(&url).await.unwrap();
    run_contract(store).await;
}
