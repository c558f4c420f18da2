pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::dinosaurs::{DinosaurIndex, DinosaurLookup};
pub use crate::core::manifest::DeploymentArtifact;
pub use crate::core::upstream::DeployClient;
pub use crate::domain::ports::{ConfigProvider, ProjectProvider};
pub use crate::server::{router, serve, AppState};
pub use crate::utils::error::{RelayError, Result, UpstreamError, UpstreamResult};
