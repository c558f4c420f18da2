#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub const DEFAULT_API_ENDPOINT: &str = "https://api.deno.com/projects";
pub const DEFAULT_ORGANIZATION_ID: &str = "22931876-226c-4cbd-9f56-964c80efa2c6";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Stand-in for secrets in `Debug` output.
pub(crate) fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}
