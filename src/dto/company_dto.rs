use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::company::Company;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            email: c.email,
            name: c.name,
            is_active: c.is_active,
            date_joined: c.date_joined,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterCompanyPayload {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CompanyLoginPayload {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Returned by register and login. Send the token back as
/// `Authorization: Token <token>`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyAuthResponse {
    pub company: CompanyResponse,
    pub token: String,
}
