use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

/// Client registration for one OAuth2 identity provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Base URL of the provider REST API, without a trailing slash.
    pub api_endpoint: String,
    pub authorize_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub public_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub http_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
    pub discord: ProviderConfig,
    pub twitter: ProviderConfig,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8000"),
            database_url: get_env("DATABASE_URL")?,
            public_url: get_env_or("PUBLIC_URL", "http://localhost:8000")
                .trim_end_matches('/')
                .to_string(),
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_hours: positive("JWT_TTL_HOURS", get_env_parse_or("JWT_TTL_HOURS", 24)?)?,
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", 30)?,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            discord: ProviderConfig {
                client_id: get_env("DISCORD_CLIENT_ID")?,
                client_secret: get_env("DISCORD_CLIENT_SECRET")?,
                redirect_uri: get_env("DISCORD_REDIRECT_URI")?,
                api_endpoint: endpoint("DISCORD_API_ENDPOINT", "https://discord.com/api/v10"),
                authorize_url: get_env_or(
                    "DISCORD_AUTHORIZE_URL",
                    "https://discord.com/oauth2/authorize",
                ),
            },
            twitter: ProviderConfig {
                client_id: get_env("TWITTER_CLIENT_ID")?,
                client_secret: get_env("TWITTER_CLIENT_SECRET")?,
                redirect_uri: get_env("TWITTER_REDIRECT_URI")?,
                api_endpoint: endpoint("TWITTER_API_ENDPOINT", "https://api.twitter.com/2"),
                authorize_url: get_env_or(
                    "TWITTER_AUTHORIZE_URL",
                    "https://twitter.com/i/oauth2/authorize",
                ),
            },
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn positive(name: &str, value: i64) -> Result<i64> {
    if value > 0 {
        Ok(value)
    } else {
        Err(Error::Config(format!("{} must be positive, got {}", name, value)))
    }
}

fn endpoint(name: &str, default: &str) -> String {
    get_env_or(name, default).trim_end_matches('/').to_string()
}

pub fn init_config() -> Result<&'static Config> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    get_config()
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lifetime_must_be_positive() {
        assert_eq!(positive("JWT_TTL_HOURS", 24).unwrap(), 24);
        assert!(matches!(positive("JWT_TTL_HOURS", 0), Err(Error::Config(_))));
        assert!(matches!(positive("JWT_TTL_HOURS", -5), Err(Error::Config(_))));
    }
}
