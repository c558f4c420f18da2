use crate::config::{redact, DEFAULT_API_ENDPOINT, DEFAULT_ORGANIZATION_ID};
use crate::core::manifest::DEFAULT_ENTRY_NAME;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Optional config file. Every key is optional; whatever is present overrides
/// the command line defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub dataset: DatasetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub organization_id: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub entry_name: Option<String>,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("endpoint", &self.endpoint)
            .field(
                "access_token",
                &self.access_token.as_deref().map(redact),
            )
            .field("organization_id", &self.organization_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("entry_name", &self.entry_name)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Load and parse a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RelayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse config text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RelayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value. An unset variable is an
    /// error so a placeholder never ends up as a literal token.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RelayError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        if let Some(missing) = re
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .find(|var_name| std::env::var(var_name).is_err())
        {
            return Err(RelayError::MissingConfigError { field: missing });
        }

        let result = re.replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        Ok(result.to_string())
    }

    /// Only the keys that are present are checked; absent ones fall back to defaults.
    pub fn validate_config(&self) -> Result<()> {
        if let Some(addr) = &self.server.bind_address {
            validation::validate_socket_addr("server.bind_address", addr)?;
        }
        if let Some(max) = self.server.max_upload_bytes {
            validation::validate_positive_number("server.max_upload_bytes", max, 1)?;
        }
        if let Some(endpoint) = &self.upstream.endpoint {
            validation::validate_url("upstream.endpoint", endpoint)?;
        }
        if let Some(token) = &self.upstream.access_token {
            validation::validate_secret("upstream.access_token", token)?;
        }
        if let Some(org) = &self.upstream.organization_id {
            validation::validate_non_empty_string("upstream.organization_id", org)?;
        }
        if let Some(timeout) = self.upstream.timeout_seconds {
            validation::validate_positive_number("upstream.timeout_seconds", timeout as usize, 1)?;
        }
        if let Some(entry) = &self.upstream.entry_name {
            validation::validate_non_empty_string("upstream.entry_name", entry)?;
        }
        if let Some(path) = &self.dataset.path {
            validation::validate_non_empty_string("dataset.path", path)?;
        }
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn api_endpoint(&self) -> &str {
        self.upstream.endpoint.as_deref().unwrap_or(DEFAULT_API_ENDPOINT)
    }

    fn access_token(&self) -> &str {
        self.upstream.access_token.as_deref().unwrap_or_default()
    }

    fn organization_id(&self) -> &str {
        self.upstream
            .organization_id
            .as_deref()
            .unwrap_or(DEFAULT_ORGANIZATION_ID)
    }

    fn entry_name(&self) -> &str {
        self.upstream.entry_name.as_deref().unwrap_or(DEFAULT_ENTRY_NAME)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.upstream.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
