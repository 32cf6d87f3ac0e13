use kmval_plan::TestPlan;
use serde::Deserialize;

/// The only field the indexer reads from a rendered document.
#[derive(Debug, Deserialize)]
struct KindProjection {
    #[serde(default)]
    kind: Option<String>,
}

/// Object kind of every document in a rendered stream, by stream position.
///
/// Documents whose `kind` is missing or not a string yield `None` but still
/// occupy their position, matching the index the query tool uses. A YAML
/// syntax error ends the scan, since the decoder cannot resume past it.
pub fn document_kinds(documents: &[u8]) -> Vec<Option<String>> {
    let mut kinds = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_slice(documents).enumerate() {
        let value = match serde_yaml::Value::deserialize(document) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(
                    event = "document_scan_stopped",
                    document_index = index,
                    error = %err
                );
                break;
            }
        };

        match KindProjection::deserialize(value) {
            Ok(projection) => kinds.push(projection.kind),
            Err(err) => {
                tracing::debug!(
                    event = "document_skipped",
                    document_index = index,
                    error = %err
                );
                kinds.push(None);
            }
        }
    }

    kinds
}

/// Attach rendered documents to a plan and map each planned kind to the
/// document that defines it.
///
/// When several documents share a kind the last one wins, so rules keyed by
/// kind cannot address earlier resources of the same kind.
pub fn index_documents(plan: TestPlan, documents: Vec<u8>) -> TestPlan {
    let mut plan = plan.with_rendered_documents(documents);

    for (index, kind) in document_kinds(&plan.rendered_documents)
        .into_iter()
        .enumerate()
    {
        let Some(kind) = kind else {
            continue;
        };
        if plan.object_kinds.contains(&kind) {
            plan.kind_to_document_index.insert(kind, index);
        }
    }

    tracing::debug!(
        event = "documents_indexed",
        plan = %plan.id,
        indexed = plan.kind_to_document_index.len(),
        kinds = plan.object_kinds.len()
    );
    plan
}
