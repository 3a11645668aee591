//! Store configuration.
//!
//! A [`StoreConfig`] can be built in code (tests use `Default`), or loaded
//! from a TOML file for the CLI. `data_dir = None` selects a memory-only
//! store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for the provena store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URI under which resources are addressed (`<base>/<kind>/<uuid>`).
    pub base_uri: String,
    /// Data directory for persistence. `None` for memory-only mode.
    pub data_dir: Option<PathBuf>,
    /// Namespace prefix for step URIs. Defaults to `<base>/steps/`.
    pub step_ns: Option<String>,
    /// Namespace prefix for variable URIs. Defaults to `<base>/variables/`.
    pub variable_ns: Option<String>,
    /// Download URL template for artifacts; `{artifactId}` is substituted.
    pub artifact_download_template: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_uri: "https://provena.dev/".into(),
            data_dir: None,
            step_ns: None,
            variable_ns: None,
            artifact_download_template: "https://provena.dev/artifacts/{artifactId}/download"
                .into(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: StoreConfig = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded store configuration");
        Ok(config)
    }

    /// Base URI with a guaranteed trailing slash.
    pub fn base(&self) -> String {
        let base = self.base_uri.trim();
        if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        }
    }

    /// Namespace prefix for step URIs.
    pub fn step_ns(&self) -> String {
        self.step_ns
            .clone()
            .unwrap_or_else(|| format!("{}steps/", self.base()))
    }

    /// Namespace prefix for variable URIs.
    pub fn variable_ns(&self) -> String {
        self.variable_ns
            .clone()
            .unwrap_or_else(|| format!("{}variables/", self.base()))
    }
}
