use crate::core::manifest::DeploymentArtifact;
use crate::domain::model::{Deployment, Project, ProjectSummary};
use crate::domain::ports::{ConfigProvider, ProjectProvider};
use crate::utils::error::{RelayError, Result, UpstreamError, UpstreamResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

/// Deno Deploy project API client.
pub struct DeployClient<C: ConfigProvider> {
    config: C,
    projects_url: Url,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectRequest<'a> {
    organization_id: &'a str,
}

impl<C: ConfigProvider> DeployClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let projects_url =
            Url::parse(config.api_endpoint()).map_err(|e| RelayError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: config.api_endpoint().to_string(),
                reason: format!("Invalid URL format: {}", e),
            })?;
        if projects_url.cannot_be_a_base() {
            return Err(RelayError::InvalidConfigValueError {
                field: "api_endpoint".to_string(),
                value: config.api_endpoint().to_string(),
                reason: "URL cannot carry path segments".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            projects_url,
            client: builder.build()?,
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// `{base}/{project_id}[/{suffix}]`, with the id encoded as a single segment.
    fn project_url(&self, project_id: &str, suffix: Option<&str>) -> Url {
        let mut url = self.projects_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(project_id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        url
    }

    /// Pass a 200 through; anything else becomes a classified failure.
    async fn expect_ok(response: Response, operation: &str) -> UpstreamResult<Response> {
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            operation,
            status = status.as_u16(),
            body = %body,
            "Upstream call did not succeed"
        );
        Err(UpstreamError::from_status(status))
    }
}

#[async_trait]
impl<C: ConfigProvider> ProjectProvider for DeployClient<C> {
    async fn list_projects(&self) -> UpstreamResult<Vec<Project>> {
        tracing::debug!("Making API request to: {}", self.projects_url);
        let response = self
            .client
            .get(self.projects_url.clone())
            .bearer_auth(self.config.access_token())
            .send()
            .await?;

        let response = Self::expect_ok(response, "list_projects").await?;
        let projects: Vec<Project> = response.json().await?;
        tracing::debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    async fn create_project(&self) -> UpstreamResult<ProjectSummary> {
        let request = CreateProjectRequest {
            organization_id: self.config.organization_id(),
        };

        let response = self
            .client
            .post(self.projects_url.clone())
            .bearer_auth(self.config.access_token())
            .json(&request)
            .send()
            .await?;

        let response = Self::expect_ok(response, "create_project").await?;
        let project: Project = response.json().await?;
        tracing::info!(project_id = %project.id, name = %project.name, "Created project");
        Ok(ProjectSummary::from(project))
    }

    async fn delete_project(&self, project_id: &str) -> UpstreamResult<()> {
        let url = self.project_url(project_id, None);
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .delete(url)
            .bearer_auth(self.config.access_token())
            .send()
            .await?;

        Self::expect_ok(response, "delete_project").await?;
        tracing::info!(project_id, "Deleted project");
        Ok(())
    }

    async fn deploy_artifact(
        &self,
        project_id: &str,
        artifact: DeploymentArtifact,
    ) -> UpstreamResult<Deployment> {
        let entry_name = self.config.entry_name();
        let request = artifact.deployment_request(entry_name);
        let request_json = serde_json::to_string(&request)
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        tracing::debug!(
            project_id,
            size = artifact.size(),
            git_sha1 = artifact.content_hash(),
            "Uploading deployment"
        );

        let form = Form::new()
            .text("request", request_json)
            .part(
                "file",
                Part::bytes(artifact.into_bytes()).file_name(entry_name.to_string()),
            );

        let response = self
            .client
            .post(self.project_url(project_id, Some("deployment_with_assets")))
            .bearer_auth(self.config.access_token())
            .multipart(form)
            .send()
            .await?;

        let response = Self::expect_ok(response, "deploy_artifact").await?;
        let deployment: Deployment = response.json().await?;
        tracing::info!(project_id, "Deployment accepted");
        Ok(deployment)
    }
}
