use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::{
        pagination::{Page, QueryParams, ReviewPage},
        review_dto::{CreateReviewPayload, ReviewResponse},
        Payload,
    },
    error::Result,
    middleware::auth::AuthCompany,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/review",
    params(
        ("talent" = Option<i64>, Query, description = "Only reviews of this talent"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("page_size" = Option<i64>, Query, description = "Items per page")
    ),
    responses((status = 200, description = "Paginated reviews, newest first", body = ReviewPage))
)]
#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let params = QueryParams::parse(query.as_deref());
    let request = params.page()?;
    let talent = params.parse_i64("talent")?;
    let paged = state.review_service.list(talent, request.window()).await?;
    Ok(Json(Page::<ReviewResponse>::new(paged, request)?))
}

#[utoipa::path(
    post,
    path = "/api/review",
    request_body = CreateReviewPayload,
    responses(
        (status = 201, description = "Review posted", body = ReviewResponse),
        (status = 400, description = "Invalid payload or unknown talent"),
        (status = 401, description = "Not authenticated as a company")
    ),
    security(("token" = []))
)]
#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    AuthCompany(company): AuthCompany,
    Payload(payload): Payload<CreateReviewPayload>,
) -> Result<impl IntoResponse> {
    let review = state.review_service.create(&company, payload).await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

#[utoipa::path(
    get,
    path = "/api/review/{id}",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review found", body = ReviewResponse),
        (status = 404, description = "Review not found")
    )
)]
#[axum::debug_handler]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let review = state.review_service.get(id).await?;
    Ok(Json(ReviewResponse::from(review)))
}
