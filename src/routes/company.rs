use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        company_dto::{
            CompanyAuthResponse, CompanyLoginPayload, CompanyResponse, RegisterCompanyPayload,
        },
        Payload,
    },
    error::Result,
    middleware::auth::AuthCompany,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/company/register",
    request_body = RegisterCompanyPayload,
    responses(
        (status = 201, description = "Company registered", body = CompanyAuthResponse),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterCompanyPayload>,
) -> Result<impl IntoResponse> {
    let (company, token) = state.company_service.register(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CompanyAuthResponse {
            company: company.into(),
            token,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/company/login",
    request_body = CompanyLoginPayload,
    responses(
        (status = 200, description = "Logged in", body = CompanyAuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Inactive account")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Payload(payload): Payload<CompanyLoginPayload>,
) -> Result<Json<CompanyAuthResponse>> {
    let (company, token) = state.company_service.login(payload).await?;
    Ok(Json(CompanyAuthResponse {
        company: company.into(),
        token,
    }))
}

#[utoipa::path(
    get,
    path = "/api/company/me",
    responses(
        (status = 200, description = "The authenticated company", body = CompanyResponse),
        (status = 401, description = "Not authenticated as a company")
    ),
    security(("token" = []))
)]
#[axum::debug_handler(state = AppState)]
pub async fn me(AuthCompany(company): AuthCompany) -> Json<CompanyResponse> {
    Json(company.into())
}
