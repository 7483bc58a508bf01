use std::fmt;

/// Resource-owner credentials for the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub account: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// `acr_values` form field selecting the tenant.
    pub fn acr_values(&self) -> String {
        format!("Tenant:{}", self.account)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account", &self.account)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
