use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::info;
use url::Url;

use crate::config::ProviderConfig;
use crate::dto::auth_dto::TokenSet;
use crate::error::{Error, Result};
use crate::models::talent::NewTalent;
use crate::services::identity_service::{
    parse_user_id, IdentityProvider, OAuthClient, Provider, ProviderIdentity,
};
use crate::utils::{locale::language_from_locale, token::strip_bearer};

pub const SCOPE: &str = "identify email";
const CDN: &str = "https://cdn.discordapp.com";

/// `GET /users/@me` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    pub discriminator: Option<String>,
    pub global_name: Option<String>,
    pub avatar: Option<String>,
    pub locale: Option<String>,
    pub email: Option<String>,
}

impl DiscordUser {
    /// `username#discriminator`, or the bare username for accounts on the
    /// new username system (discriminator `0`).
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() && d != "0" => format!("{}#{}", self.username, d),
            _ => self.username.clone(),
        }
    }

    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!("{}/avatars/{}/{}.webp", CDN, self.id, hash),
            None => {
                let index = match self.discriminator.as_deref() {
                    Some(d) if d != "0" => d.parse::<u64>().unwrap_or(0) % 5,
                    _ => (self.id.parse::<u64>().unwrap_or(0) >> 22) % 6,
                };
                format!("{}/embed/avatars/{}.png", CDN, index)
            }
        }
    }

    fn into_identity(self) -> Result<ProviderIdentity> {
        let id = parse_user_id(Provider::Discord, &self.id)?;
        let profile = NewTalent {
            id,
            avatar: self.avatar_url(),
            username: self.username.clone(),
            global_name: self.global_name.clone().unwrap_or_default(),
            language: language_from_locale(self.locale.as_deref()),
            email: self.email.clone(),
            discord_profile: Some(self.tag()),
            twitter_profile: None,
            last_login: None,
        };
        Ok(ProviderIdentity {
            provider: Provider::Discord,
            profile,
        })
    }
}

#[derive(Clone)]
pub struct DiscordService {
    client: OAuthClient,
}

impl DiscordService {
    pub fn new(http: Client, config: ProviderConfig) -> Self {
        Self {
            client: OAuthClient::new(http, config),
        }
    }

    pub fn authorize_url(&self) -> Result<String> {
        let config = self.client.config();
        let url = Url::parse_with_params(
            &config.authorize_url,
            &[
                ("client_id", config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", config.redirect_uri.as_str()),
                ("scope", SCOPE),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid Discord authorize URL: {}", e)))?;
        Ok(url.into())
    }

    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let redirect_uri = self.client.config().redirect_uri.clone();
        self.client
            .grant(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri.as_str()),
            ])
            .await?
            .ok_or_else(|| {
                Error::BadRequest("Failed to exchange authorization code with Discord".to_string())
            })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenSet> {
        self.client
            .grant(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", strip_bearer(refresh_token)),
            ])
            .await?
            .ok_or_else(|| Error::Authentication("Failed to refresh Discord token".to_string()))
    }

    pub async fn revoke(&self, access_token: &str) -> Result<bool> {
        let revoked = self
            .client
            .revoke(
                "/oauth2/token/revoke",
                &[
                    ("token", strip_bearer(access_token)),
                    ("token_type_hint", "access_token"),
                ],
            )
            .await?;
        info!(revoked, "Discord token revocation");
        Ok(revoked)
    }
}

#[async_trait]
impl IdentityProvider for DiscordService {
    fn provider(&self) -> Provider {
        Provider::Discord
    }

    async fn identify(&self, access_token: &str) -> Result<Option<ProviderIdentity>> {
        let user = self
            .client
            .get_json::<DiscordUser>("/users/@me", access_token)
            .await?;
        user.map(DiscordUser::into_identity).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(discriminator: Option<&str>, avatar: Option<&str>) -> DiscordUser {
        DiscordUser {
            id: "80351110224678912".into(),
            username: "nelly".into(),
            discriminator: discriminator.map(str::to_string),
            global_name: Some("Nelly".into()),
            avatar: avatar.map(str::to_string),
            locale: Some("en-US".into()),
            email: Some("nelly@discord.com".into()),
        }
    }

    #[test]
    fn tag_drops_zero_discriminator() {
        assert_eq!(user(Some("1337"), None).tag(), "nelly#1337");
        assert_eq!(user(Some("0"), None).tag(), "nelly");
        assert_eq!(user(None, None).tag(), "nelly");
    }

    #[test]
    fn avatar_urls() {
        assert_eq!(
            user(Some("1337"), Some("8342729096ea3675442027381ff50dfe")).avatar_url(),
            "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.webp"
        );
        assert_eq!(
            user(Some("1337"), None).avatar_url(),
            "https://cdn.discordapp.com/embed/avatars/2.png"
        );
    }

    #[test]
    fn maps_profile_fields() {
        let identity = user(Some("1337"), None).into_identity().unwrap();
        assert_eq!(identity.id(), 80351110224678912);
        assert_eq!(identity.profile.language, "English");
        assert_eq!(identity.profile.global_name, "Nelly");
        assert_eq!(identity.handle(), Some("nelly#1337"));
    }
}
