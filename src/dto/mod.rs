pub mod auth_dto;
pub mod company_dto;
pub mod experience_dto;
pub mod job_dto;
pub mod pagination;
pub mod review_dto;
pub mod talent_dto;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// Longest skill or job type name the schema stores.
pub const MAX_NAME_LENGTH: usize = 100;

/// `Json` whose rejections render through [`Error`] as a 400.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct Payload<T>(pub T);

/// Raw JSON body, decoded only when [`JsonBody::parse`] is called. Write
/// handlers on owned resources hand it to the service so that 404 and 403
/// are reported before a malformed body.
#[derive(Debug, Clone)]
pub struct JsonBody(Bytes);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::BadRequest(e.body_text()))?;
        Ok(Self(bytes))
    }
}

impl JsonBody {
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.0).map_err(|e| {
            Error::BadRequest(format!("Failed to deserialize the JSON body: {}", e))
        })
    }
}

/// Names sent to the skill and job type endpoints: `{"name": [..]}`.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct NamesPayload {
    #[serde(default)]
    pub name: Vec<String>,
}

impl NamesPayload {
    /// Trimmed, non-empty, de-duplicated (case-insensitively) in input order.
    /// Names longer than [`MAX_NAME_LENGTH`] characters are rejected.
    pub fn normalized(&self) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        let names: Vec<String> = self
            .name
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .filter(|n| seen.insert(n.to_lowercase()))
            .map(str::to_string)
            .collect();
        if let Some(long) = names.iter().find(|n| n.chars().count() > MAX_NAME_LENGTH) {
            return Err(Error::BadRequest(format!(
                "Ensure this name has no more than {} characters: {}...",
                MAX_NAME_LENGTH,
                long.chars().take(20).collect::<String>()
            )));
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_deduplicated() {
        let payload = NamesPayload {
            name: vec![" Rust ".into(), "rust".into(), "".into(), "Go".into()],
        };
        assert_eq!(payload.normalized().unwrap(), vec!["Rust", "Go"]);
    }

    #[test]
    fn names_longer_than_the_column_are_rejected() {
        let at_limit = NamesPayload {
            name: vec!["x".repeat(MAX_NAME_LENGTH)],
        };
        assert!(at_limit.normalized().is_ok());

        let too_long = NamesPayload {
            name: vec!["x".repeat(MAX_NAME_LENGTH + 1)],
        };
        assert!(matches!(too_long.normalized(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn json_body_decodes_on_demand() {
        let body = JsonBody(Bytes::from_static(br#"{"name": ["Rust"]}"#));
        let names: NamesPayload = body.parse().unwrap();
        assert_eq!(names.name, vec!["Rust"]);

        let wrong = JsonBody(Bytes::from_static(br#"{"name": 5}"#));
        assert!(matches!(
            wrong.parse::<NamesPayload>(),
            Err(Error::BadRequest(_))
        ));
    }
}
