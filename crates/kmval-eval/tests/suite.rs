mod common;

use common::{FixtureRenderer, PathEvaluator};
use kmval_core::{Manifest, parse_manifest};
use kmval_eval::{EvalError, ExecuteOptions, ExecutionEngine, SuiteMode, SuiteRunner};
use kmval_plan::PlanId;

fn manifest() -> Manifest {
    parse_manifest(
        r#"
common:
  ConfigMap:
    defined:
      .data.a: true
      .data.b: true
artifacts:
  alpha:
    base: {}
  beta:
    base: {}
  gamma:
    base: {}
"#,
    )
    .expect("parse manifest")
}

const COMPLETE: &str = "kind: ConfigMap\ndata:\n  a: x\n  b: y\n";
const MISSING_BOTH: &str = "kind: ConfigMap\ndata: {}\n";

fn renderer() -> FixtureRenderer {
    FixtureRenderer::default()
        .with("alpha/base", COMPLETE)
        .with("beta/base", MISSING_BOTH)
        .with("gamma/base", COMPLETE)
}

#[tokio::test]
async fn full_run_executes_every_plan() {
    let renderer = renderer();
    let evaluator = PathEvaluator::default();
    let engine = ExecutionEngine::new(evaluator.clone(), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer.clone(), engine, SuiteMode::FullRun);

    let mut seen = Vec::new();
    let outcome = runner
        .run_with(&manifest(), |plan| seen.push(plan.id.to_string()))
        .await
        .expect("run suite");

    assert!(!outcome.success());
    assert!(!outcome.stopped_early);
    assert_eq!(seen, vec!["alpha/base", "beta/base", "gamma/base"]);
    assert_eq!(renderer.rendered(), seen);
    assert_eq!(
        outcome.passed(),
        vec![PlanId::new("alpha", "base"), PlanId::new("gamma", "base")]
    );
    assert_eq!(outcome.failed(), vec![PlanId::new("beta", "base")]);
    assert_eq!(outcome.plans[1].failures.len(), 2);
    assert_eq!(evaluator.calls().len(), 6);
}

#[tokio::test]
async fn fail_fast_stops_after_first_failing_query() {
    let renderer = renderer();
    let evaluator = PathEvaluator::default();
    let engine = ExecutionEngine::new(evaluator.clone(), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer.clone(), engine, SuiteMode::FailFast);

    let outcome = runner.run(&manifest()).await.expect("run suite");

    assert!(!outcome.success());
    assert!(outcome.stopped_early);
    assert_eq!(outcome.plans.len(), 2);
    assert!(outcome.plans[1].halted);
    assert_eq!(outcome.plans[1].checks.len(), 1);
    assert_eq!(renderer.rendered(), vec!["alpha/base", "beta/base"]);
    // alpha: two queries, beta: stopped after its first.
    assert_eq!(evaluator.calls().len(), 3);
}

#[tokio::test]
async fn passing_suite_reports_success() {
    let renderer = FixtureRenderer::default()
        .with("alpha/base", COMPLETE)
        .with("beta/base", COMPLETE)
        .with("gamma/base", COMPLETE);
    let engine = ExecutionEngine::new(PathEvaluator::default(), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer, engine, SuiteMode::FailFast);

    let outcome = runner.run(&manifest()).await.expect("run suite");

    assert!(outcome.success());
    assert!(!outcome.stopped_early);
    assert_eq!(outcome.plans.len(), 3);
    assert!(outcome.failed().is_empty());
}

#[tokio::test]
async fn overlays_run_after_base_in_name_order() {
    let manifest = parse_manifest(
        r#"
artifacts:
  web:
    overlays:
      prod: {}
      dev: {}
"#,
    )
    .expect("parse manifest");
    let renderer = FixtureRenderer::default()
        .with("web/base", "")
        .with("web/dev", "")
        .with("web/prod", "");
    let engine = ExecutionEngine::new(PathEvaluator::default(), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer.clone(), engine, SuiteMode::FullRun);

    let outcome = runner.run(&manifest).await.expect("run suite");

    assert!(outcome.success());
    assert_eq!(renderer.rendered(), vec!["web/base", "web/dev", "web/prod"]);
}

#[tokio::test]
async fn render_failure_aborts_the_suite() {
    let renderer = FixtureRenderer::default().with("alpha/base", COMPLETE);
    let engine = ExecutionEngine::new(PathEvaluator::default(), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer.clone(), engine, SuiteMode::FullRun);

    let err = runner.run(&manifest()).await.expect_err("render failure");

    match err {
        EvalError::Render { plan, source } => {
            assert_eq!(plan, "beta/base");
            assert!(source.to_string().contains("no fixture for beta/base"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(renderer.rendered(), vec!["alpha/base", "beta/base"]);
}

#[tokio::test]
async fn query_failure_aborts_the_suite_in_full_run_mode() {
    let engine = ExecutionEngine::new(PathEvaluator::failing_on(".data.b"), ExecuteOptions::default());
    let runner = SuiteRunner::new(renderer(), engine, SuiteMode::FullRun);

    let err = runner.run(&manifest()).await.expect_err("query failure");
    assert!(matches!(err, EvalError::Query { .. }));
}
