use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::dto::auth_dto::TokenSet;
use crate::error::{Error, Result};
use crate::models::talent::{NewTalent, Talent};
use crate::services::talent_service::TalentService;
use crate::utils::token::strip_bearer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Discord,
    Twitter,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Discord => f.write_str("discord"),
            Provider::Twitter => f.write_str("twitter"),
        }
    }
}

/// A provider account mapped onto the fields of a new talent.
#[derive(Debug, Clone)]
pub struct ProviderIdentity {
    pub provider: Provider,
    pub profile: NewTalent,
}

impl ProviderIdentity {
    pub fn id(&self) -> i64 {
        self.profile.id
    }

    /// The provider handle (`discord_profile` or `twitter_profile`).
    pub fn handle(&self) -> Option<&str> {
        match self.provider {
            Provider::Discord => self.profile.discord_profile.as_deref(),
            Provider::Twitter => self.profile.twitter_profile.as_deref(),
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// Looks the access token up at the provider's user-info endpoint.
    /// `Ok(None)` means the provider rejected the token.
    async fn identify(&self, access_token: &str) -> Result<Option<ProviderIdentity>>;
}

pub(crate) fn parse_user_id(provider: Provider, raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| Error::Authentication(format!("Unexpected {} user id: {}", provider, raw)))
}

/// HTTP plumbing shared by the provider clients: token grants with HTTP
/// Basic client authentication and bearer-authenticated JSON reads.
#[derive(Clone)]
pub struct OAuthClient {
    http: Client,
    config: ProviderConfig,
}

impl OAuthClient {
    pub fn new(http: Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_endpoint, path)
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .post(self.url(path))
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await
    }

    /// Runs a grant against `/oauth2/token`. `Ok(None)` when the provider
    /// cannot be reached, refuses the grant, or answers with an unreadable
    /// token set.
    pub async fn grant(&self, form: &[(&str, &str)]) -> Result<Option<TokenSet>> {
        let response = match self.post_form("/oauth2/token", form).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token endpoint unreachable");
                return Ok(None);
            }
        };
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "token grant rejected");
            return Ok(None);
        }
        match response.json::<TokenSet>().await {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                warn!(error = %e, "token grant returned an unreadable body");
                Ok(None)
            }
        }
    }

    /// True only when the provider answered 200.
    pub async fn revoke(&self, path: &str, form: &[(&str, &str)]) -> Result<bool> {
        match self.post_form(path, form).await {
            Ok(response) => {
                debug!(status = %response.status(), "token revocation answered");
                Ok(response.status() == StatusCode::OK)
            }
            Err(e) => {
                warn!(error = %e, "revocation endpoint unreachable");
                Ok(false)
            }
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<Option<T>> {
        let response = match self
            .http
            .get(self.url(path))
            .bearer_auth(strip_bearer(access_token))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, path, "user lookup failed");
                return Ok(None);
            }
        };
        if !response.status().is_success() {
            debug!(status = %response.status(), path, "user lookup rejected");
            return Ok(None);
        }
        match response.json::<T>().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, path, "user lookup returned an unreadable body");
                Ok(None)
            }
        }
    }
}

/// Resolves talent credentials (`Authorization: Bearer <provider token>`)
/// by asking each provider in turn.
#[derive(Clone)]
pub struct AuthService {
    providers: Vec<Arc<dyn IdentityProvider>>,
    talents: TalentService,
}

impl AuthService {
    pub fn new(providers: Vec<Arc<dyn IdentityProvider>>, talents: TalentService) -> Self {
        Self { providers, talents }
    }

    /// The first provider that recognises the token wins. The talent is
    /// created on first sight; `last_login` is left alone.
    pub async fn authenticate(&self, access_token: &str) -> Result<Talent> {
        let token = strip_bearer(access_token);
        if token.is_empty() {
            return Err(Error::Unauthorized(
                "Authentication credentials were not provided.".to_string(),
            ));
        }

        for provider in &self.providers {
            match provider.identify(token).await {
                Ok(Some(identity)) => return self.talents.sign_in(identity, false).await,
                Ok(None) => continue,
                Err(e) => {
                    warn!(provider = %provider.provider(), error = %e, "identity lookup failed");
                    continue;
                }
            }
        }

        Err(Error::Authentication("Invalid token.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snowflake_ids() {
        assert_eq!(
            parse_user_id(Provider::Discord, "80351110224678912").unwrap(),
            80351110224678912
        );
        assert!(parse_user_id(Provider::Twitter, "abc").is_err());
    }

    #[test]
    fn handle_follows_provider() {
        let identity = ProviderIdentity {
            provider: Provider::Twitter,
            profile: NewTalent {
                id: 1,
                twitter_profile: Some("jack".into()),
                discord_profile: Some("ignored".into()),
                ..NewTalent::default()
            },
        };
        assert_eq!(identity.handle(), Some("jack"));
    }
}
