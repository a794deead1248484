use std::convert::Infallible;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderValue},
};

use crate::utils::token::random_alphanumeric;

pub const SESSION_COOKIE: &str = "sessionid";
const SESSION_KEY_LENGTH: usize = 32;
const MAX_SESSION_KEY_LENGTH: usize = 40;
/// Two weeks.
const SESSION_MAX_AGE: u64 = 1_209_600;

/// Anonymous session key used to count unique profile visits. A fresh key
/// is minted when the request carries none (or a malformed one).
#[derive(Debug, Clone)]
pub struct SessionKey {
    pub key: String,
    pub issued: bool,
}

impl SessionKey {
    fn from_cookie_header(value: &str) -> Option<String> {
        value
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .map(|(_, key)| key.trim().to_string())
            .filter(|key| {
                !key.is_empty()
                    && key.len() <= MAX_SESSION_KEY_LENGTH
                    && key.chars().all(|c| c.is_ascii_alphanumeric())
            })
    }

    /// `Set-Cookie` value for a newly issued key.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.issued {
            return None;
        }
        HeaderValue::from_str(&format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, self.key, SESSION_MAX_AGE
        ))
        .ok()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let existing = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(Self::from_cookie_header);

        Ok(match existing {
            Some(key) => SessionKey { key, issued: false },
            None => SessionKey {
                key: random_alphanumeric(SESSION_KEY_LENGTH),
                issued: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_session_cookie() {
        assert_eq!(
            SessionKey::from_cookie_header("csrftoken=x; sessionid=abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(SessionKey::from_cookie_header("csrftoken=x"), None);
        assert_eq!(SessionKey::from_cookie_header("sessionid=bad key!"), None);
    }

    #[test]
    fn only_new_keys_set_a_cookie() {
        let existing = SessionKey {
            key: "abc".into(),
            issued: false,
        };
        assert!(existing.set_cookie().is_none());

        let issued = SessionKey {
            key: "abc".into(),
            issued: true,
        };
        let cookie = issued.set_cookie().unwrap();
        assert!(cookie.to_str().unwrap().starts_with("sessionid=abc;"));
    }
}
