pub mod company;
pub mod experience;
pub mod health;
pub mod index;
pub mod job;
pub mod oauth;
pub mod review;
pub mod talent;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware::cors::cors_layer, AppState};

pub fn router(state: AppState) -> Router {
    let meta = Router::new()
        .route("/", get(index::index))
        .route("/api", get(index::api_root))
        .route("/api/schema", get(index::schema))
        .route("/health", get(health::health));

    let talents = Router::new()
        .route("/api/talent", get(talent::list_talents))
        .route(
            "/api/talent/:id",
            get(talent::get_talent)
                .patch(talent::update_talent)
                .delete(talent::delete_talent),
        )
        .route("/api/talent/:id/username", put(talent::update_username))
        .route("/api/talent/:id/about-me", put(talent::update_about_me))
        .route("/api/talent/:id/summary", put(talent::update_summary))
        .route("/api/talent/:id/language", put(talent::update_language))
        .route("/api/talent/:id/timezone", put(talent::update_timezone))
        .route("/api/talent/:id/avatar", put(talent::update_avatar))
        .route(
            "/api/talent/:id/skills",
            get(talent::get_skills).put(talent::replace_skills),
        )
        .route(
            "/api/talent/:id/average-rating",
            get(talent::average_rating),
        )
        .route("/api/skill", get(talent::list_skills));

    let jobs = Router::new()
        .route("/api/job", get(job::list_jobs).post(job::create_job))
        .route(
            "/api/job/:id",
            get(job::get_job)
                .put(job::replace_job)
                .patch(job::update_job)
                .delete(job::delete_job),
        )
        .route(
            "/api/job/:id/job-types",
            get(job::get_job_types).put(job::replace_job_types),
        )
        .route("/api/job-type", get(job::list_job_types));

    let profiles = Router::new()
        .route(
            "/api/experience",
            get(experience::list_experiences).post(experience::create_experience),
        )
        .route(
            "/api/experience/:id",
            get(experience::get_experience)
                .put(experience::replace_experience)
                .patch(experience::update_experience)
                .delete(experience::delete_experience),
        )
        .route(
            "/api/review",
            get(review::list_reviews).post(review::create_review),
        )
        .route("/api/review/:id", get(review::get_review));

    let companies = Router::new()
        .route("/api/company/register", post(company::register))
        .route("/api/company/login", post(company::login))
        .route("/api/company/me", get(company::me));

    let oauth = Router::new()
        .route("/discord/login", get(oauth::discord_login))
        .route("/discord/login/redirect", get(oauth::discord_callback))
        .route("/discord/refresh", post(oauth::discord_refresh))
        .route("/discord/revoke", post(oauth::discord_revoke))
        .route("/twitter/login", get(oauth::twitter_login))
        .route("/twitter/login/redirect", get(oauth::twitter_callback))
        .route("/twitter/refresh", post(oauth::twitter_refresh))
        .route("/twitter/revoke", post(oauth::twitter_revoke));

    let cors = cors_layer(&state.config.cors_allowed_origins);

    meta.merge(talents)
        .merge(jobs)
        .merge(profiles)
        .merge(companies)
        .merge(oauth)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
