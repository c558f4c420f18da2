use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use dino_relay::core::{Deployment, Project, ProjectSummary};
use dino_relay::server::{DEFAULT_MAX_UPLOAD_BYTES, NO_DINOSAURS_FOUND};
use dino_relay::{
    router, AppState, DeploymentArtifact, DinosaurIndex, ProjectProvider, UpstreamError,
    UpstreamResult,
};
use reqwest::StatusCode as UpstreamStatus;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

const BOUNDARY: &str = "dino-relay-test-boundary";

/// Provider double: succeeds or fails on demand and records deploy uploads.
#[derive(Default)]
struct StubProvider {
    fail: bool,
    deployed: Mutex<Vec<(String, u64, String)>>,
}

impl StubProvider {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProjectProvider for StubProvider {
    async fn list_projects(&self) -> UpstreamResult<Vec<Project>> {
        if self.fail {
            return Err(UpstreamError::Status(UpstreamStatus::BAD_GATEWAY));
        }
        Ok(serde_json::from_value(serde_json::json!([
            {"id": "p1", "name": "alpha", "createdAt": "2024-01-01T00:00:00Z"}
        ]))
        .unwrap())
    }

    async fn create_project(&self) -> UpstreamResult<ProjectSummary> {
        if self.fail {
            return Err(UpstreamError::Timeout);
        }
        Ok(ProjectSummary {
            name: "x".to_string(),
            id: "abc".to_string(),
        })
    }

    async fn delete_project(&self, project_id: &str) -> UpstreamResult<()> {
        if self.fail || project_id == "missing" {
            return Err(UpstreamError::NotFound);
        }
        Ok(())
    }

    async fn deploy_artifact(
        &self,
        project_id: &str,
        artifact: DeploymentArtifact,
    ) -> UpstreamResult<Deployment> {
        if self.fail {
            return Err(UpstreamError::Unauthorized(UpstreamStatus::UNAUTHORIZED));
        }
        self.deployed.lock().await.push((
            project_id.to_string(),
            artifact.size(),
            artifact.content_hash().to_string(),
        ));
        Ok(serde_json::json!({"id": "dep-1", "projectId": project_id}))
    }
}

fn app(provider: Arc<StubProvider>) -> axum::Router {
    app_with_limit(provider, DEFAULT_MAX_UPLOAD_BYTES)
}

fn app_with_limit(provider: Arc<StubProvider>, max_upload_bytes: usize) -> axum::Router {
    let dinosaurs = DinosaurIndex::from_json_str(
        r#"[
            {"name": "Stegosaurus", "description": "Plated."},
            {"name": "Trex", "description": "Big teeth."}
        ]"#,
    )
    .unwrap();
    let state = Arc::new(AppState::new(provider, Arc::new(dinosaurs)));
    router(state, max_upload_bytes)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_request(uri: &str, field_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"main.ts\"\r\n",
            field_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/typescript\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn list_relays_projects() {
    let (status, body) = send(app(Arc::new(StubProvider::default())), get("/list")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        serde_json::json!([
            {"id": "p1", "name": "alpha", "createdAt": "2024-01-01T00:00:00Z"}
        ])
    );
}

#[tokio::test]
async fn list_failure_is_generic_500() {
    let (status, body) = send(app(Arc::new(StubProvider::failing())), get("/list")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "failed listing functions"}));
}

#[tokio::test]
async fn create_returns_201_with_projection() {
    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(StubProvider::default())), request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json(&body), serde_json::json!({"name": "x", "id": "abc"}));
}

#[tokio::test]
async fn create_failure_is_generic_500() {
    let request = Request::builder()
        .method("POST")
        .uri("/create")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(StubProvider::failing())), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "failed creating function"}));
}

#[tokio::test]
async fn delete_reports_project_id() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/delete/p1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(StubProvider::default())), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({"projectId": "p1", "deleted": true}));
}

#[tokio::test]
async fn delete_of_absent_project_is_500() {
    let request = Request::builder()
        .method("DELETE")
        .uri("/delete/missing")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(Arc::new(StubProvider::default())), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "failed deleting function"}));
}

#[tokio::test]
async fn deploy_hashes_uploaded_file() {
    let provider = Arc::new(StubProvider::default());
    let source = "console.log(\"🦖\");\n";

    let (status, body) = send(
        app(provider.clone()),
        multipart_request("/deploy/p1", "file", source.as_bytes()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["id"], "dep-1");

    let deployed = provider.deployed.lock().await;
    assert_eq!(deployed.len(), 1);
    let (project_id, size, hash) = &deployed[0];
    assert_eq!(project_id, "p1");
    assert_eq!(*size, source.len() as u64);
    assert_eq!(hash, &dino_relay::core::manifest::git_blob_sha1(source.as_bytes()));
}

#[tokio::test]
async fn deploy_without_file_field_is_rejected() {
    let provider = Arc::new(StubProvider::default());
    let (status, body) = send(
        app(provider.clone()),
        multipart_request("/deploy/p1", "attachment", b"code"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), serde_json::json!({"error": "missing file field"}));
    assert!(provider.deployed.lock().await.is_empty());
}

#[tokio::test]
async fn deploy_requires_multipart() {
    let request = Request::builder()
        .method("POST")
        .uri("/deploy/p1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(app(Arc::new(StubProvider::default())), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body), serde_json::json!({"error": "invalid multipart body"}));
}

#[tokio::test]
async fn deploy_over_upload_limit_is_413() {
    let provider = Arc::new(StubProvider::default());
    let oversized = vec![b'x'; 1000];

    let (status, body) = send(
        app_with_limit(provider.clone(), 16),
        multipart_request("/deploy/p1", "file", &oversized),
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json(&body), serde_json::json!({"error": "invalid multipart body"}));
    assert!(provider.deployed.lock().await.is_empty());
}

#[tokio::test]
async fn deploy_failure_is_generic_500() {
    let (status, body) = send(
        app(Arc::new(StubProvider::failing())),
        multipart_request("/deploy/p1", "file", b"code"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), serde_json::json!({"error": "failed deploying function"}));
}

#[tokio::test]
async fn api_returns_whole_dataset() {
    let (status, body) = send(app(Arc::new(StubProvider::default())), get("/api")).await;

    assert_eq!(status, StatusCode::OK);
    let records = json(&body);
    assert_eq!(records.as_array().unwrap().len(), 2);
    assert_eq!(records[0]["name"], "Stegosaurus");
}

#[tokio::test]
async fn api_lookup_is_case_insensitive() {
    for uri in ["/api/stegosaurus", "/api/STEGOSAURUS", "/api/Stegosaurus"] {
        let (status, body) = send(app(Arc::new(StubProvider::default())), get(uri)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            serde_json::json!({"name": "Stegosaurus", "description": "Plated."})
        );
    }
}

#[tokio::test]
async fn api_lookup_miss_is_still_200() {
    let (status, body) = send(app(Arc::new(StubProvider::default())), get("/api/unknown")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), NO_DINOSAURS_FOUND);
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/api")
        .header(header::ORIGIN, "https://somewhere.example")
        .body(Body::empty())
        .unwrap();
    let response = app(Arc::new(StubProvider::default()))
        .oneshot(request)
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn health_check_responds() {
    let (status, body) = send(app(Arc::new(StubProvider::default())), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), serde_json::json!({"status": "healthy"}));
}
