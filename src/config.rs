//! Configuration types.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Runtime configuration, read from `PORTAL_*` environment variables.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the portal REST backend, without a trailing slash.
    pub api_base_url: String,
    /// Path of the current-user profile endpoint.
    pub profile_path: String,
    /// Bearer token for the backend session, if any.
    pub api_token: Option<SecretString>,
    /// User id the persisted step is scoped to.
    pub user_id: String,
    /// Local database file.
    pub db_path: PathBuf,
    /// Port the onboarding HTTP server listens on.
    pub http_port: u16,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            profile_path: "/doctor/profile".to_string(),
            api_token: None,
            user_id: "default".to_string(),
            db_path: PathBuf::from("./data/doctor-portal.db"),
            http_port: 8080,
        }
    }
}

impl PortalConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("PORTAL_API_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("PORTAL_API_BASE_URL".to_string()))?;
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "PORTAL_API_BASE_URL".to_string(),
                message: format!("expected an http(s) URL, got {api_base_url:?}"),
            });
        }

        let profile_path = match lookup("PORTAL_PROFILE_PATH") {
            Some(p) if p.starts_with('/') => p,
            Some(p) if !p.is_empty() => format!("/{p}"),
            _ => defaults.profile_path,
        };

        let http_port = match lookup("PORTAL_HTTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "PORTAL_HTTP_PORT".to_string(),
                message: e.to_string(),
            })?,
            None => defaults.http_port,
        };

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            profile_path,
            api_token: lookup("PORTAL_API_TOKEN")
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            user_id: lookup("PORTAL_USER_ID")
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.user_id),
            db_path: lookup("PORTAL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            http_port,
        })
    }

    /// Full URL of the profile endpoint.
    pub fn profile_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.profile_path)
    }
}
