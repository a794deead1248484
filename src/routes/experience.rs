use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        experience_dto::{ExperiencePatchPayload, ExperiencePayload, ExperienceResponse},
        pagination::{ExperiencePage, Page, QueryParams},
        JsonBody, Payload,
    },
    error::Result,
    middleware::auth::AuthTalent,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/experience",
    params(
        ("talent" = Option<i64>, Query, description = "Only experiences of this talent"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Paginated experiences", body = ExperiencePage))
)]
#[axum::debug_handler]
pub async fn list_experiences(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let params = QueryParams::parse(query.as_deref());
    let request = params.page()?;
    let talent = params.parse_i64("talent")?;
    let paged = state
        .experience_service
        .list(talent, request.window())
        .await?;
    Ok(Json(Page::<ExperienceResponse>::new(paged, request)?))
}

#[utoipa::path(
    post,
    path = "/api/experience",
    request_body = ExperiencePayload,
    responses(
        (status = 201, description = "Experience added to the caller's profile", body = ExperienceResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_experience(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Payload(payload): Payload<ExperiencePayload>,
) -> Result<impl IntoResponse> {
    let experience = state.experience_service.create(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(experience)))
}

#[utoipa::path(
    get,
    path = "/api/experience/{id}",
    params(("id" = i64, Path, description = "Experience ID")),
    responses(
        (status = 200, description = "Experience found", body = ExperienceResponse),
        (status = 404, description = "Experience not found")
    )
)]
#[axum::debug_handler]
pub async fn get_experience(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExperienceResponse>> {
    Ok(Json(state.experience_service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/experience/{id}",
    params(("id" = i64, Path, description = "Experience ID")),
    request_body = ExperiencePayload,
    responses(
        (status = 200, description = "Experience replaced", body = ExperienceResponse),
        (status = 403, description = "Experience belongs to another talent")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn replace_experience(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<Json<ExperienceResponse>> {
    Ok(Json(
        state.experience_service.replace(&actor, id, body).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/experience/{id}",
    params(("id" = i64, Path, description = "Experience ID")),
    request_body = ExperiencePatchPayload,
    responses(
        (status = 200, description = "Experience updated", body = ExperienceResponse),
        (status = 403, description = "Experience belongs to another talent")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_experience(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<Json<ExperienceResponse>> {
    Ok(Json(
        state.experience_service.patch(&actor, id, body).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/experience/{id}",
    params(("id" = i64, Path, description = "Experience ID")),
    responses(
        (status = 204, description = "Experience deleted"),
        (status = 403, description = "Experience belongs to another talent")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_experience(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.experience_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
