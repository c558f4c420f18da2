use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A project as reported by the upstream provider.
///
/// Only `id` and `name` are interpreted; every other upstream field is kept
/// as-is so list responses can be relayed without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `{name, id}` projection returned to callers after a create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub id: String,
}

impl From<Project> for ProjectSummary {
    fn from(project: Project) -> Self {
        Self {
            name: project.name,
            id: project.id,
        }
    }
}

/// Deployment descriptor returned by the upstream provider, relayed verbatim.
pub type Deployment = Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinosaurRecord {
    pub name: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}
