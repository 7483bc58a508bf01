use chrono::{DateTime, Duration, Utc};

/// Bearer token issued by the authentication endpoint.
///
/// Replaced wholesale on refresh; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    token_type: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Returns `None` when the lifetime is negative or the expiry is not representable.
    pub fn new(
        value: impl Into<String>,
        token_type: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in: i64,
    ) -> Option<Self> {
        if expires_in < 0 {
            return None;
        }
        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))?;
        Some(Self {
            value: value.into(),
            token_type: token_type.into(),
            expires_at,
        })
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Strict wall-clock check, no skew margin.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Value of the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_active_until_expiry() {
        let issued = Utc::now();
        let token = AccessToken::new("abc", "Bearer", issued, 3600).unwrap();
        assert!(token.is_active_at(issued));
        assert!(token.is_active_at(issued + Duration::seconds(3599)));
        assert!(!token.is_active_at(issued + Duration::seconds(3600)));
    }

    #[test]
    fn test_zero_lifetime_token_is_never_active() {
        let issued = Utc::now();
        let token = AccessToken::new("abc", "Bearer", issued, 0).unwrap();
        assert!(!token.is_active_at(issued));
    }

    #[test]
    fn test_unrepresentable_lifetime_is_rejected() {
        let issued = Utc::now();
        assert!(AccessToken::new("abc", "Bearer", issued, i64::MAX).is_none());
        assert!(AccessToken::new("abc", "Bearer", issued, 10_000_000_000_000).is_none());
        assert!(AccessToken::new("abc", "Bearer", issued, -1).is_none());
    }

    #[test]
    fn test_authorization_value() {
        let token = AccessToken::new("abc", "bearer", Utc::now(), 10).unwrap();
        assert_eq!(token.authorization_value(), "Bearer abc");
    }
}
