use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{company::Company, talent::Talent};
use crate::AppState;

/// JWT body of a company token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

fn credential<'a>(parts: &'a Parts, scheme: &str) -> Result<&'a str> {
    let missing = || {
        Error::Unauthorized("Authentication credentials were not provided.".to_string())
    };
    let header = parts.headers.get(AUTHORIZATION).ok_or_else(missing)?;
    let value = header
        .to_str()
        .map_err(|_| Error::Unauthorized("Invalid authorization header.".to_string()))?;
    let (given, token) = value.split_once(' ').ok_or_else(missing)?;
    if !given.eq_ignore_ascii_case(scheme) {
        return Err(missing());
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}

/// Talent identified by `Authorization: Bearer <provider access token>`.
#[derive(Debug, Clone)]
pub struct AuthTalent(pub Talent);

#[async_trait]
impl FromRequestParts<AppState> for AuthTalent {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = credential(parts, "Bearer")?;
        let talent = state.auth_service.authenticate(token).await?;
        Ok(AuthTalent(talent))
    }
}

/// Company identified by `Authorization: Token <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthCompany(pub Company);

#[async_trait]
impl FromRequestParts<AppState> for AuthCompany {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let token = credential(parts, "Token")?;
        let company = state.company_service.authenticate(token).await?;
        Ok(AuthCompany(company))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn extracts_matching_scheme() {
        assert_eq!(credential(&parts(Some("Bearer abc")), "Bearer").unwrap(), "abc");
        assert_eq!(credential(&parts(Some("token xyz")), "Token").unwrap(), "xyz");
    }

    #[test]
    fn rejects_missing_or_foreign_scheme() {
        assert!(credential(&parts(None), "Bearer").is_err());
        assert!(credential(&parts(Some("Token abc")), "Bearer").is_err());
        assert!(credential(&parts(Some("Bearer ")), "Bearer").is_err());
    }
}
