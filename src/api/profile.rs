//! Profile client — fetches the logged-in doctor's profile over HTTP.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::PortalConfig;
use crate::error::ProfileError;
use crate::onboarding::{ProfileSnapshot, ProfileSource};

/// Portal backend client for the current-user profile endpoint.
pub struct ProfileClient {
    url: String,
    token: Option<SecretString>,
    client: reqwest::Client,
}

impl ProfileClient {
    pub fn new(url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            url: url.into(),
            token,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &PortalConfig) -> Self {
        Self::new(config.profile_url(), config.api_token.clone())
    }
}

#[async_trait]
impl ProfileSource for ProfileClient {
    async fn fetch_profile(&self) -> Result<ProfileSnapshot, ProfileError> {
        let mut request = self.client.get(&self.url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let resp = request
            .send()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ProfileError::Unauthorized);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProfileError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProfileError::InvalidResponse(e.to_string()))?;
        debug!(url = %self.url, "Profile fetched");

        Ok(ProfileSnapshot::from_response(&body))
    }
}
