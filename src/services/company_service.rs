use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, warn};
use validator::Validate;

use crate::database::DynStore;
use crate::dto::company_dto::{CompanyLoginPayload, RegisterCompanyPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::company::{Company, NewCompany};
use crate::utils::crypto::{hash_password, verify_password};

pub const COMPANY_ROLE: &str = "company";

/// Lower-cases the domain part, leaving the local part as typed.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
        None => email.to_string(),
    }
}

#[derive(Clone)]
pub struct CompanyService {
    store: DynStore,
    jwt_secret: String,
    ttl_hours: i64,
}

impl CompanyService {
    pub fn new(store: DynStore, jwt_secret: String, ttl_hours: i64) -> Self {
        Self {
            store,
            jwt_secret,
            ttl_hours,
        }
    }

    pub async fn register(&self, payload: RegisterCompanyPayload) -> Result<(Company, String)> {
        payload.validate()?;
        let email = normalize_email(&payload.email);
        if self.store.get_company_by_email(&email).await?.is_some() {
            return Err(Error::Conflict(
                "A company with this email already exists.".to_string(),
            ));
        }
        let company = self
            .store
            .insert_company(NewCompany {
                email,
                name: payload.name.trim().to_string(),
                password_hash: hash_password(&payload.password)?,
            })
            .await?;
        info!(company_id = company.id, "company registered");
        let token = self.issue_token(&company)?;
        Ok((company, token))
    }

    pub async fn login(&self, payload: CompanyLoginPayload) -> Result<(Company, String)> {
        payload.validate()?;
        let email = normalize_email(&payload.email);
        let invalid = || Error::Authentication("Invalid email or password.".to_string());

        let company = self
            .store
            .get_company_by_email(&email)
            .await?
            .ok_or_else(invalid)?;
        if !verify_password(&payload.password, &company.password_hash)? {
            warn!(company_id = company.id, "failed company login");
            return Err(invalid());
        }
        if !company.is_active {
            return Err(Error::Forbidden("This account is inactive.".to_string()));
        }
        let token = self.issue_token(&company)?;
        Ok((company, token))
    }

    pub fn issue_token(&self, company: &Company) -> Result<String> {
        let exp = Utc::now() + Duration::hours(self.ttl_hours);
        let exp = usize::try_from(exp.timestamp())
            .map_err(|_| Error::Internal(format!("Token expiry out of range: {}", exp)))?;
        let claims = Claims {
            sub: company.id.to_string(),
            exp,
            role: Some(COMPANY_ROLE.to_string()),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Resolves a `Token` credential to an active company.
    pub async fn authenticate(&self, token: &str) -> Result<Company> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )?;
        if data.claims.role.as_deref() != Some(COMPANY_ROLE) {
            return Err(Error::Authentication("Invalid token.".to_string()));
        }
        let id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| Error::Authentication("Invalid token.".to_string()))?;
        match self.store.get_company(id).await? {
            Some(company) if company.is_active => Ok(company),
            _ => Err(Error::Authentication(
                "User inactive or deleted.".to_string(),
            )),
        }
    }
}
