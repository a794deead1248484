use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Random `[A-Za-z0-9]` string, used for OAuth state, PKCE verifiers and
/// session keys.
pub fn random_alphanumeric(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Drops a leading `Bearer ` from a token supplied by a client.
pub fn strip_bearer(token: &str) -> &str {
    let token = token.trim();
    token.strip_prefix("Bearer ").unwrap_or(token).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        let value = random_alphanumeric(64);
        assert_eq!(value.len(), 64);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn strips_bearer_prefix() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
    }
}
