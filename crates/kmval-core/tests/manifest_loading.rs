use std::fs;

use kmval_core::{Error, Expectation, ValidationKind, load_manifest, parse_manifest};

const MANIFEST: &str = r#"
common:
  Deployment:
    defined:
      select(.spec.replicas): true
artifacts:
  web:
    base: {}
    overlays:
      prod:
        Deployment:
          integers:
            select(.spec.replicas): 3
          partials:
            .metadata.namespace: prod
  api:
    base:
      Service:
        strings:
          .spec.type: ClusterIP
"#;

#[test]
fn loads_layers_and_names_artifacts() {
    let manifest = parse_manifest(MANIFEST).expect("parse manifest");

    assert_eq!(manifest.common["Deployment"].defined["select(.spec.replicas)"], true);
    assert_eq!(manifest.artifacts.len(), 2);
    assert_eq!(manifest.artifacts["web"].name, "web");
    assert_eq!(manifest.artifacts["api"].name, "api");
    assert!(manifest.artifacts["web"].base.is_empty());
    assert_eq!(
        manifest.artifacts["web"].overlays["prod"]["Deployment"].integers["select(.spec.replicas)"],
        3
    );
    assert_eq!(manifest.plan_count(), 3);
}

#[test]
fn variants_start_with_base_then_sorted_overlays() {
    let manifest = parse_manifest(
        r#"
artifacts:
  web:
    overlays:
      staging: {}
      dev: {}
      prod: {}
"#,
    )
    .expect("parse manifest");

    let variants: Vec<&str> = manifest.artifacts["web"].variants().collect();
    assert_eq!(variants, vec!["base", "dev", "prod", "staging"]);
}

#[test]
fn rule_set_yields_typed_expectations() {
    let manifest = parse_manifest(MANIFEST).expect("parse manifest");
    let rules = &manifest.artifacts["web"].overlays["prod"]["Deployment"];

    let expectations: Vec<(String, Expectation)> = rules
        .expectations()
        .map(|(query, expectation)| (query.to_string(), expectation))
        .collect();

    assert_eq!(
        expectations,
        vec![
            (
                "select(.spec.replicas)".to_string(),
                Expectation::ExactInteger(3)
            ),
            (
                ".metadata.namespace".to_string(),
                Expectation::Substring("prod".to_string())
            ),
        ]
    );
    assert_eq!(expectations[1].1.kind(), ValidationKind::Substring);
}

#[test]
fn empty_manifest_has_no_plans() {
    let manifest = parse_manifest("").expect("parse empty manifest");
    assert!(manifest.common.is_empty());
    assert_eq!(manifest.plan_count(), 0);
}

#[test]
fn rejects_query_declared_under_two_kinds() {
    let err = parse_manifest(
        r#"
common:
  ConfigMap:
    defined:
      .data.key: true
    strings:
      .data.key: value
"#,
    )
    .expect_err("duplicate query should be rejected");

    match err {
        Error::InvalidManifest(message) => {
            assert!(message.contains("common.ConfigMap"), "{message}");
            assert!(message.contains("'defined' and 'strings'"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_reserved_overlay_name() {
    let err = parse_manifest(
        r#"
artifacts:
  web:
    overlays:
      base: {}
"#,
    )
    .expect_err("reserved overlay should be rejected");

    assert!(matches!(err, Error::InvalidManifest(_)));
}

#[test]
fn rejects_unknown_validation_keys() {
    let err = parse_manifest(
        r#"
common:
  Deployment:
    defind:
      .spec: true
"#,
    )
    .expect_err("typo should be rejected");

    assert!(matches!(err, Error::Yaml(_)));
}

#[test]
fn rejects_non_integer_expectations() {
    let err = parse_manifest(
        r#"
common:
  Deployment:
    integers:
      .spec.replicas: three
"#,
    )
    .expect_err("string in integers should be rejected");

    assert!(matches!(err, Error::Yaml(_)));
}

#[test]
fn load_reports_missing_file_path() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("validations.yaml");

    let err = load_manifest(&path).expect_err("missing file");
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("validations.yaml"));
}

#[test]
fn load_reads_manifest_from_disk() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("validations.yaml");
    fs::write(&path, MANIFEST).expect("write manifest");

    let manifest = load_manifest(&path).expect("load manifest");
    assert_eq!(manifest, parse_manifest(MANIFEST).expect("parse manifest"));
}
