use crate::config::toml_config::TomlConfig;
use crate::config::{
    redact, DEFAULT_API_ENDPOINT, DEFAULT_BIND_ADDRESS, DEFAULT_ORGANIZATION_ID,
};
use crate::core::manifest::DEFAULT_ENTRY_NAME;
use crate::domain::ports::ConfigProvider;
use crate::server::DEFAULT_MAX_UPLOAD_BYTES;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize, Parser)]
#[command(name = "dino-relay")]
#[command(about = "HTTP relay for Deno Deploy projects with a dinosaur lookup API")]
pub struct CliConfig {
    #[arg(long, env = "RELAY_BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind_address: String,

    #[arg(long, env = "DENO_API_ENDPOINT", default_value = DEFAULT_API_ENDPOINT)]
    pub api_endpoint: String,

    #[arg(long, env = "API_TOKEN_DENO", default_value = "", hide_env_values = true)]
    pub access_token: String,

    #[arg(long, env = "DENO_ORGANIZATION_ID", default_value = DEFAULT_ORGANIZATION_ID)]
    pub organization_id: String,

    #[arg(long, help = "JSON file replacing the embedded dinosaur dataset")]
    pub dataset_path: Option<String>,

    #[arg(long, help = "Upstream request timeout; the client default applies when unset")]
    pub request_timeout_seconds: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[arg(long, default_value = DEFAULT_ENTRY_NAME)]
    pub entry_name: String,

    #[arg(long, help = "TOML config file; its values override the flags above")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("bind_address", &self.bind_address)
            .field("api_endpoint", &self.api_endpoint)
            .field("access_token", &redact(&self.access_token))
            .field("organization_id", &self.organization_id)
            .field("dataset_path", &self.dataset_path)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("entry_name", &self.entry_name)
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .field("json_logs", &self.json_logs)
            .finish()
    }
}

impl CliConfig {
    /// Validate a config file, then overlay it. An invalid file leaves the
    /// flag values untouched.
    pub fn merge_file(&mut self, file: &TomlConfig) -> Result<()> {
        file.validate()?;
        self.apply_file(file);
        Ok(())
    }

    /// Overlay the keys present in a config file.
    pub fn apply_file(&mut self, file: &TomlConfig) {
        if let Some(addr) = &file.server.bind_address {
            self.bind_address = addr.clone();
        }
        if let Some(max) = file.server.max_upload_bytes {
            self.max_upload_bytes = max;
        }
        if let Some(endpoint) = &file.upstream.endpoint {
            self.api_endpoint = endpoint.clone();
        }
        if let Some(token) = &file.upstream.access_token {
            self.access_token = token.clone();
        }
        if let Some(org) = &file.upstream.organization_id {
            self.organization_id = org.clone();
        }
        if let Some(timeout) = file.upstream.timeout_seconds {
            self.request_timeout_seconds = Some(timeout);
        }
        if let Some(entry) = &file.upstream.entry_name {
            self.entry_name = entry.clone();
        }
        if let Some(path) = &file.dataset.path {
            self.dataset_path = Some(path.clone());
        }
        if let Some(verbose) = file.logging.verbose {
            self.verbose = verbose;
        }
        if let Some(json) = file.logging.json {
            self.json_logs = json;
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("bind_address", &self.bind_address)
    }
}

impl ConfigProvider for CliConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn organization_id(&self) -> &str {
        &self.organization_id
    }

    fn entry_name(&self) -> &str {
        &self.entry_name
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        validation::validate_url("api_endpoint", &self.api_endpoint)?;
        validation::validate_secret("access_token", &self.access_token)?;
        validation::validate_non_empty_string("organization_id", &self.organization_id)?;
        validation::validate_non_empty_string("entry_name", &self.entry_name)?;
        validation::validate_positive_number("max_upload_bytes", self.max_upload_bytes, 1)?;
        if let Some(timeout) = self.request_timeout_seconds {
            validation::validate_positive_number("request_timeout_seconds", timeout as usize, 1)?;
        }
        if let Some(path) = &self.dataset_path {
            validation::validate_non_empty_string("dataset_path", path)?;
        }
        Ok(())
    }
}
