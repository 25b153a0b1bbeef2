//! Backend settings resolution.

use crate::credentials::{Credentials, normalize_url};
use serde::{Deserialize, Serialize};

/// Service endpoint used when nothing else is configured.
pub const DEFAULT_CLOUD_URL: &str = "https://api.stackline.io";

/// Overrides the API URL.
pub const API_URL_ENV: &str = "STACKLINE_API";
/// Overrides the stored access token.
pub const ACCESS_TOKEN_ENV: &str = "STACKLINE_ACCESS_TOKEN";
/// Overrides the console host.
pub const CONSOLE_DOMAIN_ENV: &str = "STACKLINE_CONSOLE_DOMAIN";

/// Everything a cloud backend needs to talk to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    pub cloud_url: String,
    pub access_token: Option<String>,
    pub console_domain: Option<String>,
}

impl BackendSettings {
    /// Resolve settings from an explicit URL, stored credentials and the environment.
    ///
    /// Precedence for the URL is explicit, then `STACKLINE_API`, then the
    /// current account, then [`DEFAULT_CLOUD_URL`]. Environment variables
    /// take precedence over the stored account for the token and console domain.
    pub fn resolve<F>(explicit_url: Option<&str>, credentials: &Credentials, lookup_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| lookup_env(key).filter(|v| !v.is_empty());

        let cloud_url = explicit_url
            .map(str::to_string)
            .or_else(|| env(API_URL_ENV))
            .or_else(|| credentials.current.clone())
            .unwrap_or_else(|| DEFAULT_CLOUD_URL.to_string());
        let cloud_url = normalize_url(&cloud_url).to_string();

        let account = credentials.account(&cloud_url);

        let access_token = env(ACCESS_TOKEN_ENV)
            .or_else(|| account.and_then(|a| a.access_token.clone()));
        let console_domain = env(CONSOLE_DOMAIN_ENV)
            .or_else(|| account.and_then(|a| a.console_domain.clone()));

        Self {
            cloud_url,
            access_token,
            console_domain,
        }
    }

    /// Resolve settings against the process environment.
    pub fn from_env(explicit_url: Option<&str>, credentials: &Credentials) -> Self {
        Self::resolve(explicit_url, credentials, |key| std::env::var(key).ok())
    }
}
