use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::manifest::{BASE_OVERLAY, Manifest};
use crate::rules::{Layer, RuleSet, ValidationKind};

/// Validate internal consistency of a manifest.
///
/// This checks:
/// - no overlay is named `base`
/// - artifact, overlay, kind and query names are not blank
/// - a query is declared under at most one validation kind per rule set
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    validate_layer("common", &manifest.common)?;

    for (name, artifact) in &manifest.artifacts {
        if name.trim().is_empty() {
            return Err(Error::InvalidManifest(
                "artifact name must not be empty".to_string(),
            ));
        }

        validate_layer(&format!("artifacts.{name}.base"), &artifact.base)?;

        for (overlay, layer) in &artifact.overlays {
            if overlay == BASE_OVERLAY {
                return Err(Error::InvalidManifest(format!(
                    "artifacts.{name}.overlays: overlay name '{BASE_OVERLAY}' is reserved for the base variant"
                )));
            }
            if overlay.trim().is_empty() {
                return Err(Error::InvalidManifest(format!(
                    "artifacts.{name}.overlays: overlay name must not be empty"
                )));
            }

            validate_layer(&format!("artifacts.{name}.overlays.{overlay}"), layer)?;
        }
    }

    Ok(())
}

fn validate_layer(path: &str, layer: &Layer) -> Result<()> {
    for (kind, rules) in layer {
        if kind.trim().is_empty() {
            return Err(Error::InvalidManifest(format!(
                "{path}: object kind must not be empty"
            )));
        }
        validate_rule_set(&format!("{path}.{kind}"), rules)?;
    }
    Ok(())
}

fn validate_rule_set(path: &str, rules: &RuleSet) -> Result<()> {
    let mut seen: BTreeMap<&str, ValidationKind> = BTreeMap::new();

    for (query, expectation) in rules.expectations() {
        if query.trim().is_empty() {
            return Err(Error::InvalidManifest(format!(
                "{path}.{}: query must not be empty",
                expectation.kind().manifest_key()
            )));
        }

        if let Some(previous) = seen.insert(query, expectation.kind()) {
            return Err(Error::InvalidManifest(format!(
                "{path}: query '{query}' is declared under both '{}' and '{}'",
                previous.manifest_key(),
                expectation.kind().manifest_key()
            )));
        }
    }

    Ok(())
}
