use std::path::PathBuf;

use thiserror::Error;

/// Core error type shared across kmval crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The manifest is not valid YAML or does not match the expected shape.
    #[error("malformed manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The manifest parsed but violates rule invariants.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),
}

/// Convenience alias for results returned by kmval crates.
pub type Result<T> = std::result::Result<T, Error>;
