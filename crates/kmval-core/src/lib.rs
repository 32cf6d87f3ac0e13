//! Core contracts for kmval.
//!
//! This crate defines the validation rule model, manifest loading and the
//! load-time checks shared by the resolver, the executor and the CLI.

pub mod error;
pub mod manifest;
pub mod rules;
pub mod validation;

pub use error::{Error, Result};
pub use manifest::{
    Artifact, BASE_OVERLAY, DEFAULT_MANIFEST_FILE, Manifest, load_manifest, parse_manifest,
};
pub use rules::{Expectation, Layer, RuleSet, ValidationKind};
pub use validation::validate_manifest;
