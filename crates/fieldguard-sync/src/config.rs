//! Sync client configuration.
//!
//! Defaults point at the hosted service. Override through environment
//! variables or explicit construction for staging and tests.

use url::Url;

use crate::error::EnvError;

pub const DEFAULT_API_DOMAIN: &str = "https://api.interwv.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and as whom schema documents are pushed.
///
/// `Debug` redacts `api_token`.
#[derive(Clone)]
pub struct SyncConfig {
    pub api_domain: Url,
    pub project_id: String,
    /// Bearer token for the project.
    pub api_token: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("api_domain", &self.api_domain)
            .field("project_id", &self.project_id)
            .field("api_token", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SyncConfig {
    pub fn new(
        api_domain: Url,
        project_id: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            api_domain,
            project_id: project_id.into(),
            api_token: api_token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `FIELDGUARD_API_DOMAIN` (default: `https://api.interwv.com`)
    /// - `FIELDGUARD_PROJECT_ID` (required)
    /// - `FIELDGUARD_API_TOKEN` (required)
    /// - `FIELDGUARD_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`SyncConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EnvError> {
        let api_token =
            lookup("FIELDGUARD_API_TOKEN").ok_or(EnvError::Missing("FIELDGUARD_API_TOKEN"))?;
        let project_id =
            lookup("FIELDGUARD_PROJECT_ID").ok_or(EnvError::Missing("FIELDGUARD_PROJECT_ID"))?;
        let raw_domain =
            lookup("FIELDGUARD_API_DOMAIN").unwrap_or_else(|| DEFAULT_API_DOMAIN.to_string());
        let timeout_secs = match lookup("FIELDGUARD_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| EnvError::InvalidValue("FIELDGUARD_TIMEOUT_SECS", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_domain: parse_url("FIELDGUARD_API_DOMAIN", &raw_domain)?,
            project_id,
            api_token,
            timeout_secs,
        })
    }

    /// Endpoint that receives interface definitions for the project.
    pub fn interfaces_url(&self) -> String {
        format!(
            "{}/api/v1/projects/{}/interfaces",
            self.api_domain.as_str().trim_end_matches('/'),
            self.project_id
        )
    }
}

pub(crate) fn parse_url(var: &str, raw: &str) -> Result<Url, EnvError> {
    Url::parse(raw).map_err(|e| EnvError::InvalidUrl(var.to_string(), e.to_string()))
}
