#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::{ConfigProvider, Credentials};
use crate::utils::error::{Result, VtuError};
use crate::utils::validation::{validate_range, validate_required_field, validate_url, Validate};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

const BASE_URL_VARS: &[&str] = &["VTU_API_BASE_URL", "NEXT_PUBLIC_VTU_API_BASE_URL"];
const USERNAME_VARS: &[&str] = &["VTU_API_USERNAME", "NEXT_PUBLIC_VTU_API_USERNAME"];
const PASSWORD_VARS: &[&str] = &["VTU_API_PASSWORD", "NEXT_PUBLIC_VTU_API_PASSWORD"];
const TIMEOUT_VARS: &[&str] = &["VTU_API_TIMEOUT_SECONDS"];

const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Billing provider settings. Credentials stay optional here so that their absence
/// is reported by [`Validate`] at startup rather than as a parse failure.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl GatewayConfig {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            username: Some(username.into()),
            password: Some(password.into()),
            timeout_seconds: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |names: &[&str]| {
            names
                .iter()
                .find_map(|&name| lookup(name))
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_url = first(BASE_URL_VARS).ok_or_else(|| VtuError::MissingConfigError {
            field: BASE_URL_VARS[0].to_string(),
        })?;

        let timeout_seconds = match first(TIMEOUT_VARS) {
            Some(raw) => Some(raw.parse().map_err(|_| VtuError::InvalidConfigValueError {
                field: TIMEOUT_VARS[0].to_string(),
                value: raw.clone(),
                reason: "Expected a whole number of seconds".to_string(),
            })?),
            None => None,
        };

        Ok(Self {
            base_url,
            username: first(USERNAME_VARS),
            password: first(PASSWORD_VARS),
            timeout_seconds,
        })
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ConfigProvider for GatewayConfig {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn credentials(&self) -> Option<Credentials> {
        let username = self.username.as_deref().filter(|v| !v.trim().is_empty())?;
        let password = self.password.as_deref().filter(|v| !v.trim().is_empty())?;
        Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_required_field("username", &self.username)?;
        validate_required_field("password", &self.password)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_range("timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        tracing::debug!("✅ Gateway configuration validation passed");
        Ok(())
    }
}
