use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use crate::config::ProviderConfig;
use crate::database::DynStore;
use crate::dto::auth_dto::TokenSet;
use crate::error::{Error, Result};
use crate::models::{pending_login::PendingLogin, talent::NewTalent};
use crate::services::identity_service::{
    parse_user_id, IdentityProvider, OAuthClient, Provider, ProviderIdentity,
};
use crate::utils::{
    locale::DEFAULT_LANGUAGE,
    pkce::{code_challenge, generate_state, generate_verifier},
    token::strip_bearer,
};

pub const SCOPE: &str = "users.read tweet.read offline.access";
const USER_PATH: &str = "/users/me?user.fields=profile_image_url";

#[derive(Debug, Clone, Deserialize)]
struct UserEnvelope {
    data: TwitterUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub profile_image_url: Option<String>,
}

impl TwitterUser {
    fn into_identity(self) -> Result<ProviderIdentity> {
        let id = parse_user_id(Provider::Twitter, &self.id)?;
        let profile = NewTalent {
            id,
            avatar: self.profile_image_url.unwrap_or_default(),
            username: self.username.clone(),
            global_name: self.name,
            language: DEFAULT_LANGUAGE.to_string(),
            email: None,
            discord_profile: None,
            twitter_profile: Some(self.username),
            last_login: None,
        };
        Ok(ProviderIdentity {
            provider: Provider::Twitter,
            profile,
        })
    }
}

/// Twitter OAuth2 with PKCE. The verifier is parked in the store under the
/// `state` value until the callback arrives.
#[derive(Clone)]
pub struct TwitterService {
    client: OAuthClient,
    store: DynStore,
}

impl TwitterService {
    pub fn new(http: Client, config: ProviderConfig, store: DynStore) -> Self {
        Self {
            client: OAuthClient::new(http, config),
            store,
        }
    }

    /// Creates a pending login and returns the authorize URL to redirect to.
    pub async fn begin_login(&self) -> Result<String> {
        let login = PendingLogin {
            state: generate_state(),
            code_verifier: generate_verifier(),
            created_at: Utc::now(),
        };
        self.store.save_pending_login(&login).await?;

        let config = self.client.config();
        let challenge = code_challenge(&login.code_verifier);
        let url = Url::parse_with_params(
            &config.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", config.client_id.as_str()),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("scope", SCOPE),
                ("state", login.state.as_str()),
                ("code_challenge", challenge.as_str()),
                ("code_challenge_method", "S256"),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid Twitter authorize URL: {}", e)))?;
        Ok(url.into())
    }

    /// Consumes the pending login for `state` and exchanges the code.
    pub async fn exchange_code(&self, code: &str, state: &str) -> Result<TokenSet> {
        let login = self
            .store
            .take_pending_login(state)
            .await?
            .ok_or_else(|| Error::BadRequest("Invalid or expired login state".to_string()))?;
        if login.is_expired(Utc::now()) {
            warn!(state, "expired Twitter login state");
            return Err(Error::BadRequest(
                "Invalid or expired login state".to_string(),
            ));
        }

        let redirect_uri = self.client.config().redirect_uri.clone();
        self.client
            .grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
                ("code_verifier", login.code_verifier.as_str()),
            ])
            .await?
            .ok_or_else(|| {
                Error::BadRequest("Failed to exchange authorization code with Twitter".to_string())
            })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        self.client
            .grant(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", strip_bearer(refresh_token)),
            ])
            .await?
            .ok_or_else(|| Error::Authentication("Failed to refresh Twitter token".to_string()))
    }

    pub async fn revoke(&self, access_token: &str) -> Result<bool> {
        let revoked = self
            .client
            .revoke(
                "/oauth2/revoke",
                &[
                    ("token", strip_bearer(access_token)),
                    ("token_type_hint", "access_token"),
                ],
            )
            .await?;
        info!(revoked, "Twitter token revocation");
        Ok(revoked)
    }

    /// Drops pending logins older than the PKCE window.
    pub async fn purge_expired(&self) -> Result<u64> {
        let cutoff = Utc::now() - chrono::Duration::minutes(PendingLogin::TTL_MINUTES);
        self.store.purge_pending_logins(cutoff).await
    }
}

#[async_trait]
impl IdentityProvider for TwitterService {
    fn provider(&self) -> Provider {
        Provider::Twitter
    }

    async fn identify(&self, access_token: &str) -> Result<Option<ProviderIdentity>> {
        let envelope = self
            .client
            .get_json::<UserEnvelope>(USER_PATH, access_token)
            .await?;
        envelope.map(|e| e.data.into_identity()).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_profile_fields() {
        let envelope: UserEnvelope = serde_json::from_str(
            r#"{"data":{"id":"2244994945","name":"Twitter Dev","username":"TwitterDev",
                "profile_image_url":"https://pbs.twimg.com/profile_images/1/a.jpg"}}"#,
        )
        .unwrap();
        let identity = envelope.data.into_identity().unwrap();
        assert_eq!(identity.id(), 2244994945);
        assert_eq!(identity.profile.global_name, "Twitter Dev");
        assert_eq!(identity.profile.language, "English");
        assert_eq!(identity.handle(), Some("TwitterDev"));
        assert_eq!(
            identity.profile.avatar,
            "https://pbs.twimg.com/profile_images/1/a.jpg"
        );
    }
}
