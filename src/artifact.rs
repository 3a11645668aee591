//! Artifact repository boundary.
//!
//! The blob side of the system is an external collaborator; the graph only
//! ever sees artifact ids and download URLs. [`ArtifactStore`] is the full
//! interface an implementation must provide; [`ArtifactEndpoint`] is the one
//! piece the graph layer consumes.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::ArtifactError;

/// Content-addressable artifact storage.
pub trait ArtifactStore {
    /// Store bytes and return the assigned artifact id.
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String, ArtifactError>;
    /// Fetch an artifact's bytes.
    fn fetch(&self, artifact_id: &str) -> Result<Vec<u8>, ArtifactError>;
    /// Delete an artifact.
    fn delete(&self, artifact_id: &str) -> Result<(), ArtifactError>;
    /// Public download URL for an artifact.
    fn url_for(&self, artifact_id: &str) -> String;
}

/// Renders download URLs from a configured template.
///
/// The template contains a literal `{artifactId}` placeholder, e.g.
/// `https://blobs.example.org/{artifactId}/download`.
#[derive(Debug, Clone)]
pub struct ArtifactEndpoint {
    template: String,
}

impl ArtifactEndpoint {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn url_for(&self, artifact_id: &str) -> String {
        self.template.replace("{artifactId}", artifact_id)
    }
}

/// In-memory artifact store, for tests and local experiments.
#[derive(Debug)]
pub struct MemoryArtifactStore {
    endpoint: ArtifactEndpoint,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArtifactStore {
    pub fn new(endpoint: ArtifactEndpoint) -> Self {
        Self {
            endpoint,
            objects: Mutex::new(HashMap::new()),
        }
    }

    fn objects(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, ArtifactError> {
        self.objects.lock().map_err(|_| ArtifactError::Backend {
            message: "artifact store lock poisoned".into(),
        })
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn upload(&self, bytes: &[u8], filename: &str) -> Result<String, ArtifactError> {
        let id = Uuid::new_v4().to_string();
        self.objects()?.insert(id.clone(), bytes.to_vec());
        tracing::debug!(artifact = %id, filename, size = bytes.len(), "stored artifact");
        Ok(id)
    }

    fn fetch(&self, artifact_id: &str) -> Result<Vec<u8>, ArtifactError> {
        self.objects()?
            .get(artifact_id)
            .cloned()
            .ok_or_else(|| ArtifactError::NotFound {
                id: artifact_id.to_string(),
            })
    }

    fn delete(&self, artifact_id: &str) -> Result<(), ArtifactError> {
        self.objects()?
            .remove(artifact_id)
            .map(|_| ())
            .ok_or_else(|| ArtifactError::NotFound {
                id: artifact_id.to_string(),
            })
    }

    fn url_for(&self, artifact_id: &str) -> String {
        self.endpoint.url_for(artifact_id)
    }
}
