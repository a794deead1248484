pub mod crypto;
pub mod locale;
pub mod pkce;
pub mod token;
pub mod validation;
