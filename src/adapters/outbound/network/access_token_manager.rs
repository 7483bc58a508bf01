use super::api_headers::{build_client, with_trailing_slash, REQUEST_TIMEOUT};
use crate::gate::domain::{AccessToken, Credentials};
use crate::shared::{GateError, GateResult, Result};
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

const TOKEN_PATH: &str = "identity/connect/token";
const SCOPE: &str = "sca_api";
const CLIENT_ID: &str = "sca_resource_owner";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Default)]
struct TokenState {
    credentials: Option<Credentials>,
    token: Option<AccessToken>,
}

/// Owns the bearer token used by authenticated endpoints
///
/// The token is acquired with a resource-owner password grant and replaced
/// wholesale on refresh. Check-and-refresh runs under one async mutex, so
/// concurrent callers that observe an expired token share a single refresh.
pub struct AccessTokenManager {
    client: reqwest::Client,
    token_url: String,
    state: Mutex<TokenState>,
}

impl AccessTokenManager {
    pub fn new(authentication_url: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT)?,
            token_url: format!("{}{}", with_trailing_slash(authentication_url), TOKEN_PATH),
            state: Mutex::new(TokenState::default()),
        })
    }

    /// Requests a token for `credentials` and remembers them for later refreshes
    ///
    /// Never fails: any problem is logged and reported as `false`.
    pub async fn authenticate(&self, credentials: Credentials) -> bool {
        let mut state = self.state.lock().await;
        let outcome = self.request_token(&credentials).await;
        state.credentials = Some(credentials);

        match outcome {
            Ok(token) => {
                info!(expires_at = %token.expires_at(), "Authenticated against the risk API");
                state.token = Some(token);
                true
            }
            Err(e) => {
                error!(error = %e, "Authentication against the risk API failed");
                false
            }
        }
    }

    /// Whether a token is held and still active
    pub async fn is_authenticated(&self) -> bool {
        self.state
            .lock()
            .await
            .token
            .as_ref()
            .is_some_and(AccessToken::is_active)
    }

    /// Returns the `Authorization` header, refreshing an expired token first
    ///
    /// # Errors
    /// - `UserNotAuthenticated` when no token was ever obtained
    /// - `FailedToRefreshToken` when the token expired and re-authentication failed;
    ///   the expired token is kept, so the manager stays not actively authenticated
    pub async fn authorization_header(&self) -> GateResult<(&'static str, String)> {
        let mut state = self.state.lock().await;

        let Some(token) = state.token.as_ref() else {
            return Err(GateError::UserNotAuthenticated);
        };

        if token.is_active() {
            return Ok((AUTHORIZATION_HEADER, token.authorization_value()));
        }

        let Some(credentials) = state.credentials.clone() else {
            return Err(GateError::UserNotAuthenticated);
        };

        debug!("Access token expired, refreshing");
        match self.request_token(&credentials).await {
            Ok(token) => {
                let value = token.authorization_value();
                state.token = Some(token);
                Ok((AUTHORIZATION_HEADER, value))
            }
            Err(e) => {
                error!(error = %e, "Failed to refresh the access token");
                Err(GateError::FailedToRefreshToken)
            }
        }
    }

    async fn request_token(&self, credentials: &Credentials) -> GateResult<AccessToken> {
        let acr_values = credentials.acr_values();
        let form = [
            ("scope", SCOPE),
            ("client_id", CLIENT_ID),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("grant_type", "password"),
            ("acr_values", acr_values.as_str()),
        ];

        let response = self.client.post(&self.token_url).form(&form[..]).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GateError::AuthenticationFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let unexpected = || GateError::UnexpectedAuthResponse { body: body.clone() };

        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|_| unexpected())?;

        match (parsed.access_token, parsed.token_type, parsed.expires_in) {
            (Some(value), Some(token_type), Some(expires_in))
                if !value.trim().is_empty() && token_type.eq_ignore_ascii_case("bearer") =>
            {
                AccessToken::new(value, token_type, Utc::now(), expires_in).ok_or_else(unexpected)
            }
            _ => Err(unexpected()),
        }
    }
}
