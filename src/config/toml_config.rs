use crate::config::GatewayConfig;
use crate::utils::error::{Result, VtuError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// File-based configuration:
///
/// ```toml
/// [gateway]
/// base_url = "https://vtu.example.com/api/v1"
/// username = "${VTU_API_USERNAME}"
/// password = "${VTU_API_PASSWORD}"
///
/// [logging]
/// level = "debug"
/// json = true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    pub gateway: GatewayConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(VtuError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content, |name| std::env::var(name).ok())?;

        toml::from_str(&processed_content).map_err(|e| VtuError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables become empty,
    /// so a missing secret is reported as missing rather than sent verbatim.
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VtuError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| {
                tracing::warn!("⚠️ Environment variable {} is not set", var_name);
                String::new()
            })
        });

        Ok(result.to_string())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.gateway.validate()
    }
}
