use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Rules for a set of object kinds, keyed by Kubernetes `kind`.
pub type Layer = BTreeMap<String, RuleSet>;

/// How a query's output is compared against its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Presence,
    ExactString,
    Substring,
    ExactInteger,
}

impl ValidationKind {
    /// Manifest key the kind is declared under.
    pub fn manifest_key(self) -> &'static str {
        match self {
            ValidationKind::Presence => "defined",
            ValidationKind::ExactString => "strings",
            ValidationKind::Substring => "partials",
            ValidationKind::ExactInteger => "integers",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationKind::Presence => "presence",
            ValidationKind::ExactString => "exact string",
            ValidationKind::Substring => "substring",
            ValidationKind::ExactInteger => "exact integer",
        };
        f.write_str(name)
    }
}

/// A typed expectation for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Expectation {
    /// The path must (`true`) or must not (`false`) resolve to a value.
    Presence(bool),
    /// The output must equal the string exactly.
    ExactString(String),
    /// The output must contain the string.
    Substring(String),
    /// The output must be the decimal rendering of the integer.
    ExactInteger(i64),
}

impl Expectation {
    pub fn kind(&self) -> ValidationKind {
        match self {
            Expectation::Presence(_) => ValidationKind::Presence,
            Expectation::ExactString(_) => ValidationKind::ExactString,
            Expectation::Substring(_) => ValidationKind::Substring,
            Expectation::ExactInteger(_) => ValidationKind::ExactInteger,
        }
    }
}

/// Validations declared for one object kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Presence checks: query -> must be defined.
    #[serde(default)]
    pub defined: BTreeMap<String, bool>,
    /// Exact string checks.
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
    /// Substring checks.
    #[serde(default)]
    pub partials: BTreeMap<String, String>,
    /// Exact integer checks.
    #[serde(default)]
    pub integers: BTreeMap<String, i64>,
}

impl RuleSet {
    /// Iterate every declared expectation.
    ///
    /// Order is fixed: `defined`, `integers`, `strings`, `partials`, each in
    /// query order. Resolution relies on this when a query is declared twice.
    pub fn expectations(&self) -> impl Iterator<Item = (&str, Expectation)> + '_ {
        let defined = self
            .defined
            .iter()
            .map(|(query, value)| (query.as_str(), Expectation::Presence(*value)));
        let integers = self
            .integers
            .iter()
            .map(|(query, value)| (query.as_str(), Expectation::ExactInteger(*value)));
        let strings = self
            .strings
            .iter()
            .map(|(query, value)| (query.as_str(), Expectation::ExactString(value.clone())));
        let partials = self
            .partials
            .iter()
            .map(|(query, value)| (query.as_str(), Expectation::Substring(value.clone())));

        defined.chain(integers).chain(strings).chain(partials)
    }

    pub fn is_empty(&self) -> bool {
        self.defined.is_empty()
            && self.strings.is_empty()
            && self.partials.is_empty()
            && self.integers.is_empty()
    }

    /// Number of declared queries across all validation kinds.
    pub fn len(&self) -> usize {
        self.defined.len() + self.strings.len() + self.partials.len() + self.integers.len()
    }
}
