use kmval_eval::{KustomizeRenderer, YqEvaluator};

/// Confirm both external tools can be launched.
///
/// Returns the binary name of the first missing tool.
pub async fn missing_tool(renderer: &KustomizeRenderer, evaluator: &YqEvaluator) -> Option<String> {
    if !renderer.is_available().await {
        return Some(renderer.binary().to_string());
    }
    if !evaluator.is_available().await {
        return Some(evaluator.binary().to_string());
    }
    tracing::debug!(
        event = "preflight_passed",
        kustomize = %renderer.binary(),
        yq = %evaluator.binary()
    );
    None
}
