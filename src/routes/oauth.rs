use axum::{
    extract::{Query, State},
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::info;

use crate::{
    dto::{
        auth_dto::{
            LoginResponse, OAuthCallbackQuery, RefreshPayload, RevokePayload, RevokeResponse,
            TokenSet,
        },
        Payload,
    },
    error::{Error, Result},
    services::identity_service::{IdentityProvider, Provider},
    AppState,
};

fn found(location: String) -> impl IntoResponse {
    (StatusCode::FOUND, [(LOCATION, location)])
}

/// Rejects callbacks that carry a provider error or no code.
fn callback_code(provider: Provider, query: &OAuthCallbackQuery) -> Result<String> {
    if let Some(error) = &query.error {
        let detail = query.error_description.as_deref().unwrap_or(error);
        return Err(Error::BadRequest(format!(
            "{} authorization failed: {}",
            provider, detail
        )));
    }
    query
        .code
        .clone()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::BadRequest("Missing authorization code".to_string()))
}

/// Shared tail of both callbacks: look the user up with the fresh token and
/// sign the matching talent in.
async fn finish_login(
    state: &AppState,
    provider: &dyn IdentityProvider,
    tokens: TokenSet,
) -> Result<LoginResponse> {
    let identity = provider
        .identify(&tokens.access_token)
        .await?
        .ok_or_else(|| {
            Error::Authentication(format!("Could not fetch the {} user", provider.provider()))
        })?;
    let talent = state.talent_service.sign_in(identity, true).await?;
    info!(talent_id = talent.id, provider = %provider.provider(), "talent logged in");
    Ok(LoginResponse::new(tokens, talent.into()))
}

#[utoipa::path(
    get,
    path = "/discord/login",
    responses((status = 302, description = "Redirect to the Discord authorize page"))
)]
#[axum::debug_handler]
pub async fn discord_login(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(found(state.discord_service.authorize_url()?))
}

#[utoipa::path(
    get,
    path = "/discord/login/redirect",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("error" = Option<String>, Query, description = "Provider error")
    ),
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing or rejected code"),
        (status = 401, description = "Discord user lookup failed")
    )
)]
#[axum::debug_handler]
pub async fn discord_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<LoginResponse>> {
    let code = callback_code(Provider::Discord, &query)?;
    let tokens = state.discord_service.exchange_code(&code).await?;
    let response = finish_login(&state, &state.discord_service, tokens).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/discord/refresh",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Fresh token set", body = TokenSet),
        (status = 401, description = "Refresh rejected")
    )
)]
#[axum::debug_handler]
pub async fn discord_refresh(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshPayload>,
) -> Result<Json<TokenSet>> {
    Ok(Json(
        state.discord_service.refresh(&payload.refresh_token).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/discord/revoke",
    request_body = RevokePayload,
    responses((status = 200, description = "Revocation outcome", body = RevokeResponse))
)]
#[axum::debug_handler]
pub async fn discord_revoke(
    State(state): State<AppState>,
    Payload(payload): Payload<RevokePayload>,
) -> Result<Json<RevokeResponse>> {
    let revoked = state.discord_service.revoke(&payload.access_token).await?;
    Ok(Json(RevokeResponse { revoked }))
}

#[utoipa::path(
    get,
    path = "/twitter/login",
    responses((status = 302, description = "Redirect to the Twitter authorize page (PKCE)"))
)]
#[axum::debug_handler]
pub async fn twitter_login(State(state): State<AppState>) -> Result<impl IntoResponse> {
    Ok(found(state.twitter_service.begin_login().await?))
}

#[utoipa::path(
    get,
    path = "/twitter/login/redirect",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by /twitter/login")
    ),
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing code, unknown or expired state"),
        (status = 401, description = "Twitter user lookup failed")
    )
)]
#[axum::debug_handler]
pub async fn twitter_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<Json<LoginResponse>> {
    let code = callback_code(Provider::Twitter, &query)?;
    let login_state = query
        .state
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::BadRequest("Missing state".to_string()))?;
    let tokens = state
        .twitter_service
        .exchange_code(&code, login_state)
        .await?;
    let response = finish_login(&state, &state.twitter_service, tokens).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/twitter/refresh",
    request_body = RefreshPayload,
    responses(
        (status = 200, description = "Fresh token set", body = TokenSet),
        (status = 401, description = "Refresh rejected")
    )
)]
#[axum::debug_handler]
pub async fn twitter_refresh(
    State(state): State<AppState>,
    Payload(payload): Payload<RefreshPayload>,
) -> Result<Json<TokenSet>> {
    Ok(Json(
        state.twitter_service.refresh(&payload.refresh_token).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/twitter/revoke",
    request_body = RevokePayload,
    responses((status = 200, description = "Revocation outcome", body = RevokeResponse))
)]
#[axum::debug_handler]
pub async fn twitter_revoke(
    State(state): State<AppState>,
    Payload(payload): Payload<RevokePayload>,
) -> Result<Json<RevokeResponse>> {
    let revoked = state.twitter_service.revoke(&payload.access_token).await?;
    Ok(Json(RevokeResponse { revoked }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_wins_over_code() {
        let query = OAuthCallbackQuery {
            code: Some("abc".into()),
            error: Some("access_denied".into()),
            ..OAuthCallbackQuery::default()
        };
        assert!(callback_code(Provider::Discord, &query).is_err());
    }

    #[test]
    fn requires_code() {
        assert!(callback_code(Provider::Twitter, &OAuthCallbackQuery::default()).is_err());
        let query = OAuthCallbackQuery {
            code: Some("abc".into()),
            ..OAuthCallbackQuery::default()
        };
        assert_eq!(callback_code(Provider::Twitter, &query).unwrap(), "abc");
    }
}
