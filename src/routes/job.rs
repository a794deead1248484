use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        job_dto::{JobPatchPayload, JobPayload, JobResponse},
        pagination::{JobPage, Page, QueryParams},
        JsonBody, NamesPayload, Payload,
    },
    error::Result,
    middleware::auth::AuthCompany,
    models::skill::JobType,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/job",
    params(
        ("job_types" = Option<Vec<String>>, Query, description = "Job type names, repeatable; matches any"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated jobs, newest first", body = JobPage),
        (status = 404, description = "Invalid page")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let params = QueryParams::parse(query.as_deref());
    let request = params.page()?;
    let paged = state
        .job_service
        .list(&params.all("job_types"), request.window())
        .await?;
    Ok(Json(Page::<JobResponse>::new(paged, request)?))
}

#[utoipa::path(
    post,
    path = "/api/job",
    request_body = JobPayload,
    responses(
        (status = 201, description = "Job posted", body = JobResponse),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Not authenticated as a company")
    ),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Payload(payload): Payload<JobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.create(&company, payload).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

#[utoipa::path(
    get,
    path = "/api/job/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    put,
    path = "/api/job/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = JobPayload,
    responses(
        (status = 200, description = "Job replaced", body = JobResponse),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    ),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn replace_job(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let job = state.job_service.replace(&company, id, body).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    patch,
    path = "/api/job/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = JobPatchPayload,
    responses(
        (status = 200, description = "Job updated", body = JobResponse),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    ),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<impl IntoResponse> {
    let job = state.job_service.patch(&company, id, body).await?;
    Ok(Json(JobResponse::from(job)))
}

#[utoipa::path(
    delete,
    path = "/api/job/{id}",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 403, description = "Job belongs to another company"),
        (status = 404, description = "Job not found")
    ),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(&company, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/job/{id}/job-types",
    params(("id" = i64, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job types of the job", body = [JobType]),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job_types(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<JobType>>> {
    Ok(Json(state.job_service.job_types(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/job/{id}/job-types",
    params(("id" = i64, Path, description = "Job ID")),
    request_body = NamesPayload,
    responses((status = 200, description = "Job types replaced", body = [JobType])),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn replace_job_types(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Path(id): Path<i64>,
    body: JsonBody,
) -> Result<Json<Vec<JobType>>> {
    Ok(Json(
        state
            .job_service
            .replace_job_types(&company, id, body)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/job-type",
    responses((status = 200, description = "All job types", body = [JobType]))
)]
#[axum::debug_handler]
pub async fn list_job_types(State(state): State<AppState>) -> Result<Json<Vec<JobType>>> {
    Ok(Json(state.job_service.list_job_types().await?))
}
