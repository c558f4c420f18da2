//! Route handlers. Upstream failures of any kind collapse into a 500 with a
//! fixed message; the cause is only visible in the logs.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::AppState;
use crate::core::dinosaurs::DinosaurLookup;
use crate::core::manifest::DeploymentArtifact;
use crate::utils::error::UpstreamError;

pub const NO_DINOSAURS_FOUND: &str = "No dinosaurs found.";

/// Multipart field carrying the code to deploy.
pub const ARTIFACT_FIELD: &str = "file";

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedResponse {
    project_id: String,
    deleted: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn error_response(status: StatusCode, error: &'static str) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}

fn upstream_failure(message: &'static str, err: &UpstreamError) -> Response {
    tracing::error!(
        error = %err,
        kind = err.kind(),
        upstream_status = err.status().map(|s| s.as_u16()),
        "{}",
        message
    );
    error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub(crate) async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

pub(crate) async fn list_projects(State(state): State<Arc<AppState>>) -> Response {
    match state.provider.list_projects().await {
        Ok(projects) => (StatusCode::OK, Json(projects)).into_response(),
        Err(err) => upstream_failure("failed listing functions", &err),
    }
}

pub(crate) async fn create_project(State(state): State<Arc<AppState>>) -> Response {
    match state.provider.create_project().await {
        Ok(summary) => (StatusCode::CREATED, Json(summary)).into_response(),
        Err(err) => upstream_failure("failed creating function", &err),
    }
}

pub(crate) async fn delete_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Response {
    match state.provider.delete_project(&project_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(DeletedResponse {
                project_id,
                deleted: true,
            }),
        )
            .into_response(),
        Err(err) => upstream_failure("failed deleting function", &err),
    }
}

pub(crate) async fn deploy_project(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Deploy request is not multipart");
            return error_response(StatusCode::BAD_REQUEST, "invalid multipart body");
        }
    };

    let bytes = match read_artifact(&mut multipart).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "missing file field"),
        Err(err) => {
            tracing::warn!(error = %err, "Failed reading deploy upload");
            return error_response(err.status(), "invalid multipart body");
        }
    };

    let artifact = DeploymentArtifact::new(bytes);
    tracing::info!(
        project_id = %project_id,
        size = artifact.size(),
        git_sha1 = artifact.content_hash(),
        "Deploying artifact"
    );

    match state.provider.deploy_artifact(&project_id, artifact).await {
        Ok(deployment) => (StatusCode::OK, Json(deployment)).into_response(),
        Err(err) => upstream_failure("failed deploying function", &err),
    }
}

async fn read_artifact(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(ARTIFACT_FIELD) {
            return Ok(Some(field.bytes().await?.to_vec()));
        }
    }
    Ok(None)
}

pub(crate) async fn list_dinosaurs(State(state): State<Arc<AppState>>) -> Response {
    lookup_response(state.dinosaurs.query(None))
}

pub(crate) async fn get_dinosaur(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    lookup_response(state.dinosaurs.query(Some(&name)))
}

fn lookup_response(lookup: DinosaurLookup<'_>) -> Response {
    match lookup {
        DinosaurLookup::All(records) => Json(records).into_response(),
        DinosaurLookup::Found(record) => Json(record).into_response(),
        // misses stay 200 with a plain-text body
        DinosaurLookup::NotFound => NO_DINOSAURS_FOUND.into_response(),
    }
}
