use serde::Serialize;
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;

pub const DEFAULT_ENTRY_NAME: &str = "main.ts";

/// Uploaded code payload with the metadata the upstream manifest needs.
#[derive(Debug, Clone)]
pub struct DeploymentArtifact {
    bytes: Vec<u8>,
    size: u64,
    content_hash: String,
}

impl DeploymentArtifact {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let size = bytes.len() as u64;
        let content_hash = git_blob_sha1(&bytes);
        Self {
            bytes,
            size,
            content_hash,
        }
    }

    /// Byte length of the payload.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Git blob SHA-1 of the payload, lower-case hex.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Describe this artifact as the single file of a non-production deployment.
    pub fn deployment_request(&self, entry_name: &str) -> DeploymentRequest {
        let mut entries = BTreeMap::new();
        entries.insert(
            entry_name.to_string(),
            ManifestEntry {
                kind: "file",
                size: self.size,
                git_sha1: self.content_hash.clone(),
            },
        );

        DeploymentRequest {
            url: format!("file:///src/{}", entry_name),
            production: false,
            manifest: Manifest { entries },
        }
    }
}

/// The JSON `request` part of a deployment upload.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentRequest {
    pub url: String,
    pub production: bool,
    pub manifest: Manifest,
}

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub entries: BTreeMap<String, ManifestEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestEntry {
    pub kind: &'static str,
    pub size: u64,
    #[serde(rename = "gitSha1")]
    pub git_sha1: String,
}

/// Hash the way `git hash-object` does: `sha1("blob <len>\0" ++ content)`.
pub fn git_blob_sha1(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("blob {}\0", content.len()).as_bytes());
    hasher.update(content);
    hex::encode(hasher.finalize())
}
