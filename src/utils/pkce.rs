use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use super::token::random_alphanumeric;

pub const VERIFIER_LENGTH: usize = 64;
pub const STATE_LENGTH: usize = 32;

/// S256 code challenge: unpadded base64url of the SHA-256 of the verifier.
pub fn code_challenge(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

pub fn generate_verifier() -> String {
    random_alphanumeric(VERIFIER_LENGTH)
}

pub fn generate_state() -> String {
    random_alphanumeric(STATE_LENGTH)
}
