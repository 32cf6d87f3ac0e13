use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rules::Layer;
use crate::validation::validate_manifest;

/// Overlay name that selects the unlayered variant of an artifact.
pub const BASE_OVERLAY: &str = "base";

/// Default manifest file name.
pub const DEFAULT_MANIFEST_FILE: &str = "validations.yaml";

/// Declarative rule file: shared rules plus per-artifact layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Rules applied to every artifact.
    #[serde(default)]
    pub common: Layer,
    /// Artifacts keyed by their directory name.
    #[serde(default)]
    pub artifacts: BTreeMap<String, Artifact>,
}

/// A renderable unit with one base variant and named overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact {
    /// Populated from the `artifacts` key after loading.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub base: Layer,
    #[serde(default)]
    pub overlays: BTreeMap<String, Layer>,
}

impl Artifact {
    /// Variant names in execution order: `base` first, then overlays by name.
    pub fn variants(&self) -> impl Iterator<Item = &str> + '_ {
        std::iter::once(BASE_OVERLAY).chain(self.overlays.keys().map(String::as_str))
    }
}

impl Manifest {
    /// Number of test plans the manifest produces.
    pub fn plan_count(&self) -> usize {
        self.artifacts
            .values()
            .map(|artifact| 1 + artifact.overlays.len())
            .sum()
    }
}

/// Read, parse and validate a manifest file.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&contents)
}

/// Parse and validate manifest YAML.
pub fn parse_manifest(contents: &str) -> Result<Manifest> {
    let mut manifest: Manifest = if contents.trim().is_empty() {
        Manifest::default()
    } else {
        serde_yaml::from_str(contents)?
    };

    for (name, artifact) in manifest.artifacts.iter_mut() {
        artifact.name = name.clone();
    }

    validate_manifest(&manifest)?;
    Ok(manifest)
}
