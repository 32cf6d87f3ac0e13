#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use kmval_eval::{NULL_OUTPUT, QueryEvaluator, Renderer, ToolError};
use serde::Deserialize;
use serde_yaml::Value;

/// Serves pre-rendered YAML per `artifact/overlay`.
#[derive(Debug, Default, Clone)]
pub struct FixtureRenderer {
    outputs: HashMap<String, String>,
    rendered: Arc<Mutex<Vec<String>>>,
}

impl FixtureRenderer {
    pub fn with(mut self, plan: &str, yaml: &str) -> Self {
        self.outputs.insert(plan.to_string(), yaml.to_string());
        self
    }

    /// Plans rendered so far, in order.
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().expect("lock renders").clone()
    }
}

#[async_trait]
impl Renderer for FixtureRenderer {
    async fn render(&self, artifact: &str, overlay: &str) -> Result<Vec<u8>, ToolError> {
        let key = format!("{artifact}/{overlay}");
        self.rendered.lock().expect("lock renders").push(key.clone());
        self.outputs
            .get(&key)
            .map(|yaml| yaml.as_bytes().to_vec())
            .ok_or_else(|| ToolError::Exit {
                tool: "kustomize".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("no fixture for {key}"),
            })
    }
}

/// Resolves dotted paths such as `.spec.replicas` or
/// `select(.spec.replicas)` against the selected document.
#[derive(Debug, Default, Clone)]
pub struct PathEvaluator {
    calls: Arc<Mutex<Vec<(usize, String)>>>,
    broken_query: Option<String>,
}

impl PathEvaluator {
    /// Make one query fail as if the tool exited non-zero.
    pub fn failing_on(query: &str) -> Self {
        Self {
            broken_query: Some(query.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(usize, String)> {
        self.calls.lock().expect("lock calls").clone()
    }
}

#[async_trait]
impl QueryEvaluator for PathEvaluator {
    async fn query(
        &self,
        documents: &[u8],
        document_index: usize,
        query: &str,
    ) -> Result<String, ToolError> {
        self.calls
            .lock()
            .expect("lock calls")
            .push((document_index, query.to_string()));

        if self.broken_query.as_deref() == Some(query) {
            return Err(ToolError::Exit {
                tool: "yq".to_string(),
                status: "exit status: 1".to_string(),
                stderr: format!("cannot evaluate {query}"),
            });
        }

        let document = serde_yaml::Deserializer::from_slice(documents)
            .nth(document_index)
            .and_then(|document| Value::deserialize(document).ok());
        let Some(document) = document else {
            return Ok(NULL_OUTPUT.to_string());
        };

        let path = query
            .strip_prefix("select(")
            .and_then(|inner| inner.strip_suffix(')'))
            .unwrap_or(query);

        let mut current = &document;
        for segment in path.split('.').filter(|segment| !segment.is_empty()) {
            match current.get(segment) {
                Some(next) => current = next,
                None => return Ok(NULL_OUTPUT.to_string()),
            }
        }

        Ok(match current {
            Value::Null => NULL_OUTPUT.to_string(),
            Value::Bool(value) => value.to_string(),
            Value::Number(value) => value.to_string(),
            Value::String(value) => value.clone(),
            other => serde_yaml::to_string(other)
                .expect("render yaml value")
                .trim()
                .to_string(),
        })
    }
}
