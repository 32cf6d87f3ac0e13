use std::path::{Path, PathBuf};
use std::time::Duration;

use kmval_core::DEFAULT_MANIFEST_FILE;
use kmval_eval::{QueryDialect, UnindexedKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "kmval.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub kustomize_bin: String,
    pub yq_bin: String,
    pub query_dialect: QueryDialect,
    /// Zero waits indefinitely.
    pub render_timeout_secs: u64,
    /// Zero waits indefinitely.
    pub query_timeout_secs: u64,
    pub unindexed_kind: UnindexedKind,
    pub fail_fast: bool,
    pub file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kustomize_bin: "kustomize".to_string(),
            yq_bin: "yq".to_string(),
            query_dialect: QueryDialect::Legacy,
            render_timeout_secs: 120,
            query_timeout_secs: 30,
            unindexed_kind: UnindexedKind::FirstDocument,
            fail_fast: false,
            file: PathBuf::from(DEFAULT_MANIFEST_FILE),
        }
    }
}

impl Settings {
    pub fn render_timeout(&self) -> Option<Duration> {
        timeout(self.render_timeout_secs)
    }

    pub fn query_timeout(&self) -> Option<Duration> {
        timeout(self.query_timeout_secs)
    }
}

fn timeout(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Load settings from an explicit path, or from `kmval.toml` under `root`
/// when present. Missing default settings fall back to [`Settings::default`].
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = root.join(SETTINGS_FILE);
            if !path.exists() {
                return Ok(Settings::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Toml { path, source })
}
