use axum::{extract::State, Json};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::{openapi::ApiDoc, AppState};

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Entry points of the service"))
)]
#[axum::debug_handler]
pub async fn index(State(state): State<AppState>) -> Json<Value> {
    let base = &state.config.public_url;
    Json(json!({
        "message": "Talent marketplace API",
        "api": format!("{}/api", base),
        "discord_login": format!("{}/discord/login", base),
        "twitter_login": format!("{}/twitter/login", base),
    }))
}

#[utoipa::path(
    get,
    path = "/api",
    responses((status = 200, description = "Links to the resource collections"))
)]
#[axum::debug_handler]
pub async fn api_root(State(state): State<AppState>) -> Json<Value> {
    let base = format!("{}/api", state.config.public_url);
    Json(json!({
        "talents": format!("{}/talent", base),
        "jobs": format!("{}/job", base),
        "reviews": format!("{}/review", base),
        "experiences": format!("{}/experience", base),
        "skills": format!("{}/skill", base),
        "job_types": format!("{}/job-type", base),
        "schema": format!("{}/schema", base),
    }))
}

pub async fn schema() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
