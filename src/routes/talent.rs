use axum::{
    extract::{Path, RawQuery, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{IntoResponse, Json, Response},
};

use crate::{
    dto::{
        pagination::{Page, QueryParams, TalentPage},
        talent_dto::{
            AboutMePayload, AvatarPayload, AverageRatingResponse, LanguagePayload,
            SummaryPayload, TalentResponse, TimezonePayload, UpdateTalentPayload,
            UsernamePayload,
        },
        JsonBody, NamesPayload,
    },
    error::{Error, Result},
    middleware::{auth::AuthTalent, session::SessionKey},
    models::{
        skill::Skill,
        talent::{TalentFilter, TalentSort},
    },
    AppState,
};

fn parse_sort(raw: Option<&str>) -> Result<Option<TalentSort>> {
    match raw {
        None => Ok(None),
        Some("most_experienced") => Ok(Some(TalentSort::MostExperienced)),
        Some("least_experienced") => Ok(Some(TalentSort::LeastExperienced)),
        Some(other) => Err(Error::BadRequest(format!(
            "Invalid sort_by value: {}. Use most_experienced or least_experienced.",
            other
        ))),
    }
}

#[utoipa::path(
    get,
    path = "/api/talent",
    params(
        ("skills" = Option<Vec<String>>, Query, description = "Skill names, repeatable; matches any"),
        ("sort_by" = Option<String>, Query, description = "most_experienced or least_experienced"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated talents", body = TalentPage),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_talents(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let params = QueryParams::parse(query.as_deref());
    let request = params.page()?;
    let filter = TalentFilter {
        skills: params
            .all("skills")
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect(),
        sort: parse_sort(params.first("sort_by"))?,
    };
    let paged = state.talent_service.list(filter, request.window()).await?;
    Ok(Json(Page::<TalentResponse>::new(paged, request)?))
}

#[utoipa::path(
    get,
    path = "/api/talent/{id}",
    params(("id" = i64, Path, description = "Talent ID")),
    responses(
        (status = 200, description = "Talent profile; counts a unique visit", body = TalentResponse),
        (status = 404, description = "Talent not found")
    )
)]
#[axum::debug_handler]
pub async fn get_talent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    session: SessionKey,
) -> Result<Response> {
    let talent = state.talent_service.view(id, &session.key).await?;
    let mut response = Json(TalentResponse::from(talent)).into_response();
    if let Some(cookie) = session.set_cookie() {
        response.headers_mut().insert(SET_COOKIE, cookie);
    }
    Ok(response)
}

#[utoipa::path(
    patch,
    path = "/api/talent/{id}",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = UpdateTalentPayload,
    responses(
        (status = 200, description = "Talent updated", body = TalentResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "Talent not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_talent(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<UpdateTalentPayload>(&actor, id, body)
        .await?;
    Ok(Json(TalentResponse::from(talent)))
}

#[utoipa::path(
    delete,
    path = "/api/talent/{id}",
    params(("id" = i64, Path, description = "Talent ID")),
    responses(
        (status = 204, description = "Talent deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the profile owner"),
        (status = 404, description = "Talent not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_talent(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.talent_service.delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/username",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = UsernamePayload,
    responses((status = 200, description = "Username updated", body = UsernamePayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_username(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<UsernamePayload>(&actor, id, body)
        .await?;
    Ok(Json(UsernamePayload::from(&talent)))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/about-me",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = AboutMePayload,
    responses((status = 200, description = "About me updated", body = AboutMePayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_about_me(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<AboutMePayload>(&actor, id, body)
        .await?;
    Ok(Json(AboutMePayload::from(&talent)))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/summary",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = SummaryPayload,
    responses((status = 200, description = "Summary updated", body = SummaryPayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_summary(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<SummaryPayload>(&actor, id, body)
        .await?;
    Ok(Json(SummaryPayload::from(&talent)))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/language",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = LanguagePayload,
    responses((status = 200, description = "Language updated", body = LanguagePayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_language(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<LanguagePayload>(&actor, id, body)
        .await?;
    Ok(Json(LanguagePayload::from(&talent)))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/timezone",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = TimezonePayload,
    responses((status = 200, description = "Timezone updated", body = TimezonePayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_timezone(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<TimezonePayload>(&actor, id, body)
        .await?;
    Ok(Json(TimezonePayload::from(&talent)))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/avatar",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = AvatarPayload,
    responses((status = 200, description = "Avatar updated", body = AvatarPayload)),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_avatar(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let talent = state
        .talent_service
        .update::<AvatarPayload>(&actor, id, body)
        .await?;
    Ok(Json(AvatarPayload::from(&talent)))
}

#[utoipa::path(
    get,
    path = "/api/talent/{id}/skills",
    params(("id" = i64, Path, description = "Talent ID")),
    responses(
        (status = 200, description = "Skills of the talent", body = [Skill]),
        (status = 404, description = "Talent not found")
    )
)]
#[axum::debug_handler]
pub async fn get_skills(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Skill>>> {
    Ok(Json(state.talent_service.skills(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/talent/{id}/skills",
    params(("id" = i64, Path, description = "Talent ID")),
    request_body = NamesPayload,
    responses(
        (status = 200, description = "Skills replaced", body = [Skill]),
        (status = 400, description = "More than five skills")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn replace_skills(
    State(state): State<AppState>,
    AuthTalent(actor): AuthTalent,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<Json<Vec<Skill>>> {
    Ok(Json(
        state.talent_service.replace_skills(&actor, id, body).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/talent/{id}/average-rating",
    params(("id" = i64, Path, description = "Talent ID")),
    responses(
        (status = 200, description = "Average review rating", body = AverageRatingResponse),
        (status = 404, description = "Talent not found")
    )
)]
#[axum::debug_handler]
pub async fn average_rating(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AverageRatingResponse>> {
    let average_rating = state.talent_service.average_rating(id).await?;
    Ok(Json(AverageRatingResponse { average_rating }))
}

#[utoipa::path(
    get,
    path = "/api/skill",
    responses((status = 200, description = "All skills", body = [Skill]))
)]
#[axum::debug_handler]
pub async fn list_skills(State(state): State<AppState>) -> Result<Json<Vec<Skill>>> {
    Ok(Json(state.talent_service.list_skills().await?))
}
