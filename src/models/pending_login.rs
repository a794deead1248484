use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// PKCE verifier parked between the Twitter login redirect and its callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PendingLogin {
    pub state: String,
    pub code_verifier: String,
    pub created_at: DateTime<Utc>,
}

impl PendingLogin {
    pub const TTL_MINUTES: i64 = 10;

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at > chrono::Duration::minutes(Self::TTL_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expires_after_ten_minutes() {
        let now = Utc::now();
        let login = |age: Duration| PendingLogin {
            state: "s".into(),
            code_verifier: "v".into(),
            created_at: now - age,
        };
        assert!(!login(Duration::minutes(9)).is_expired(now));
        assert!(!login(Duration::minutes(PendingLogin::TTL_MINUTES)).is_expired(now));
        assert!(login(Duration::minutes(PendingLogin::TTL_MINUTES) + Duration::seconds(1))
            .is_expired(now));
    }
}
