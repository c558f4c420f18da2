use crate::core::manifest::DeploymentArtifact;
use crate::domain::model::{Deployment, Project, ProjectSummary};
use crate::utils::error::UpstreamResult;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn access_token(&self) -> &str;
    fn organization_id(&self) -> &str;
    fn entry_name(&self) -> &str;
    /// `None` leaves the HTTP client's own default in place.
    fn request_timeout(&self) -> Option<Duration>;
}

/// The four project operations the relay forwards upstream.
///
/// Each call maps to exactly one outbound request and is never retried.
#[async_trait]
pub trait ProjectProvider: Send + Sync {
    async fn list_projects(&self) -> UpstreamResult<Vec<Project>>;
    async fn create_project(&self) -> UpstreamResult<ProjectSummary>;
    /// Succeeds only when the upstream answers exactly 200.
    async fn delete_project(&self, project_id: &str) -> UpstreamResult<()>;
    async fn deploy_artifact(
        &self,
        project_id: &str,
        artifact: DeploymentArtifact,
    ) -> UpstreamResult<Deployment>;
}
