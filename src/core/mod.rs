pub mod dinosaurs;
pub mod manifest;
pub mod upstream;

pub use crate::domain::model::{Deployment, DinosaurRecord, Project, ProjectSummary};
pub use crate::domain::ports::{ConfigProvider, ProjectProvider};
pub use crate::utils::error::{Result, UpstreamError, UpstreamResult};
